//! Doomsday Countdown Engine
//!
//! Platform-agnostic core of the countdown widget: remaining-time arithmetic,
//! the Stop-button prank, the chime gate and the scripted ending. This crate
//! holds no timers and no UI; hosts drive it with instants and execute the
//! [`Effect`]s it returns.

pub mod chime;
pub mod config;
pub mod constants;
pub mod effect;
pub mod ending;
pub mod engine;
pub mod face;
pub mod instant;
pub mod numbers;
pub mod remaining;
pub mod sim;

// Re-export commonly used types
pub use chime::ChimeGate;
pub use config::{
    ChimeConfig, ConfigError, CountdownConfig, EndingConfig, StopPenalty, TauntConfig, Variant,
};
pub use effect::{Effect, Timer};
pub use ending::{Cue, EndingPhase, Script, ScriptPlayer};
pub use engine::{Countdown, Status};
pub use face::{CountingFace, DigitGroup, EndingFace, EndingLine, Face};
pub use instant::{Millis, TargetInstant, offset_from_minutes, utc_offset};
pub use remaining::{FULL_UNITS, LAST_DAY_UNITS, Remaining, Unit};
pub use sim::{Simulation, StopRecord, Timeline, Trace};
