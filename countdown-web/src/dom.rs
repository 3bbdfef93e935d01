use chrono::FixedOffset;
use countdown_core::numbers::f64_to_millis;
use countdown_core::{Millis, offset_from_minutes};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

/// Retrieve the global `window` object, if running in a browser.
///
/// Never panics; callers decide what a missing window means for them.
#[must_use]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

/// Current wall-clock instant in epoch milliseconds.
///
/// Browser only; calling this outside wasm panics inside `js-sys`.
#[must_use]
pub fn now_ms() -> Millis {
    f64_to_millis(js_sys::Date::now())
}

/// The browser's current UTC offset.
///
/// `getTimezoneOffset` reports minutes *west* of UTC, so the sign flips.
#[must_use]
pub fn local_offset() -> FixedOffset {
    let minutes_west = f64_to_millis(js_sys::Date::new_0().get_timezone_offset());
    let minutes_east = i32::try_from(-minutes_west).unwrap_or(0);
    offset_from_minutes(minutes_east)
}
