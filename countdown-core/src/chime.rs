//! Rate limiting for the audible tick.

use crate::instant::Millis;

/// Admits at most one chime per `min_gap_ms` of wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChimeGate {
    last: Option<Millis>,
    min_gap_ms: u32,
}

impl ChimeGate {
    #[must_use]
    pub const fn new(min_gap_ms: u32) -> Self {
        Self {
            last: None,
            min_gap_ms,
        }
    }

    /// Decide whether a chime may sound at `now`. Suppressed calls never
    /// record a timestamp.
    pub fn admit(&mut self, now: Millis, suppressed: bool) -> bool {
        if suppressed {
            return false;
        }
        let due = self
            .last
            .is_none_or(|last| now.saturating_sub(last) >= i64::from(self.min_gap_ms));
        if due {
            self.last = Some(now);
        }
        due
    }

    #[must_use]
    pub const fn last(&self) -> Option<Millis> {
        self.last
    }
}
