//! Browser timers with ownership.
//!
//! A [`TimerHandle`] owns its JS closure and clears the browser timer when
//! dropped, so tearing down whatever holds it cancels the callback. Callbacks
//! run on a fresh task rather than inside the browser's timer callback, which
//! lets a task replace or cancel the very handle that triggered it.

use std::collections::HashMap;
use std::rc::Rc;

use countdown_core::Timer;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::dom;

pub type Task = Rc<dyn Fn()>;

fn deferred(task: Task) -> Closure<dyn FnMut()> {
    Closure::wrap(Box::new(move || {
        let task = Rc::clone(&task);
        wasm_bindgen_futures::spawn_local(async move { task() });
    }) as Box<dyn FnMut()>)
}

fn browser_ms(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

pub struct TimerHandle {
    id: i32,
    repeating: bool,
    _closure: Closure<dyn FnMut()>,
}

impl TimerHandle {
    /// Run `task` every `period_ms`.
    ///
    /// # Errors
    ///
    /// Returns the browser's error when no window exists or the interval cannot be set.
    pub fn interval(period_ms: u32, task: Task) -> Result<Self, JsValue> {
        let win = dom::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
        let closure = deferred(task);
        let id = win.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            browser_ms(period_ms),
        )?;
        Ok(Self {
            id,
            repeating: true,
            _closure: closure,
        })
    }

    /// Run `task` once after `delay_ms`.
    ///
    /// # Errors
    ///
    /// Returns the browser's error when no window exists or the timeout cannot be set.
    pub fn timeout(delay_ms: u32, task: Task) -> Result<Self, JsValue> {
        let win = dom::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
        let closure = deferred(task);
        let id = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            browser_ms(delay_ms),
        )?;
        Ok(Self {
            id,
            repeating: false,
            _closure: closure,
        })
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(win) = dom::window() {
            if self.repeating {
                win.clear_interval_with_handle(self.id);
            } else {
                win.clear_timeout_with_handle(self.id);
            }
        }
    }
}

/// At most one live browser timer per [`Timer`] kind.
///
/// Arming a kind that is already armed cancels the old one first. Dropping the
/// bank cancels everything.
#[derive(Default)]
pub struct TimerBank {
    slots: HashMap<Timer, TimerHandle>,
}

impl TimerBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Propagates the browser error; the previous timer of this kind is gone either way.
    pub fn every(&mut self, timer: Timer, period_ms: u32, task: Task) -> Result<(), JsValue> {
        self.cancel(timer);
        let handle = TimerHandle::interval(period_ms, task)?;
        self.slots.insert(timer, handle);
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates the browser error; the previous timer of this kind is gone either way.
    pub fn after(&mut self, timer: Timer, delay_ms: u32, task: Task) -> Result<(), JsValue> {
        self.cancel(timer);
        let handle = TimerHandle::timeout(delay_ms, task)?;
        self.slots.insert(timer, handle);
        Ok(())
    }

    pub fn cancel(&mut self, timer: Timer) -> bool {
        self.slots.remove(&timer).is_some()
    }

    #[must_use]
    pub fn is_armed(&self, timer: Timer) -> bool {
        self.slots.contains_key(&timer)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
