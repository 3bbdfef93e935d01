//! Fixed timing values for the countdown engine.
//!
//! Anything a deployment may want to tune lives in [`crate::config`]; these are
//! the calendar and cadence facts the engine is built around.

// Calendar -----------------------------------------------------------------
pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
pub const MILLIS_PER_HUNDREDTH: i64 = 10;

// Ticker cadence -----------------------------------------------------------
pub const BASIC_TICK_MS: u32 = 1_000;
pub const EXTENDED_TICK_MS: u32 = 10;

// Defaults -----------------------------------------------------------------
pub(crate) const DEFAULT_TARGET: &str = "2024-11-12T00:00:00";
pub(crate) const DEFAULT_GREETING: &str = "Ben...";
pub(crate) const DEFAULT_TAUNT: &str = "Failed to stop, - 1 day";
pub(crate) const DEFAULT_TAUNT_MS: u32 = 3_000;
pub(crate) const DEFAULT_CHIME_HZ: f32 = 440.0;
pub(crate) const DEFAULT_CHIME_MS: u32 = 100;
pub(crate) const DEFAULT_CHIME_GAP_MS: u32 = 1_000;
pub(crate) const DEFAULT_ENDING_FIRST: &str = "Execute decom protocol alpha...";
pub(crate) const DEFAULT_ENDING_SECOND: &str = "Goodbye Ben...";
pub(crate) const DEFAULT_FIRST_HIDE_MS: u32 = 5_000;
pub(crate) const DEFAULT_SECOND_SHOW_MS: u32 = 6_000;
pub(crate) const DEFAULT_SECOND_HIDE_MS: u32 = 11_000;

// Audible range accepted for the chime tone.
pub(crate) const MIN_CHIME_HZ: f32 = 20.0;
pub(crate) const MAX_CHIME_HZ: f32 = 20_000.0;
