//! Instructions the engine hands to its host.
//!
//! The engine never owns a timer. It asks for one with an [`Effect`] and is
//! called back through [`crate::Countdown::fire`] with the matching [`Timer`].
//! Hosts keep at most one pending timer per kind: scheduling a kind that is
//! already pending replaces it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Timer {
    /// The repeating tick.
    Ticker,
    /// Clears the taunt message and shake after a Stop press.
    TauntExpiry,
    /// Next cue of the ending sequence.
    EndingStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Effect {
    StartTicker { period_ms: u32 },
    StopTicker,
    Schedule { timer: Timer, delay_ms: u32 },
    Chime { frequency_hz: f32, duration_ms: u32 },
}

impl Effect {
    #[must_use]
    pub const fn is_chime(&self) -> bool {
        matches!(self, Self::Chime { .. })
    }
}
