//! Numeric conversion helpers centralizing the few lossy casts the engine needs.

use num_traits::cast::cast;

/// Truncate a JavaScript-style `f64` timestamp to whole milliseconds, clamping to
/// the `i64` range and returning 0 for non-finite values.
#[must_use]
pub fn f64_to_millis(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).trunc();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Convert a signed millisecond span into a timer delay, saturating at both ends.
#[must_use]
pub fn millis_to_delay(value: i64) -> u32 {
    if value <= 0 {
        return 0;
    }
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Convert milliseconds to fractional seconds for audio scheduling.
#[must_use]
pub fn millis_to_secs(value: u32) -> f64 {
    f64::from(value) / 1_000.0
}
