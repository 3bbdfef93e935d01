//! The one-shot ending sequence played after the countdown reaches zero.
//!
//! A [`Script`] is an ordered list of cues, each an offset from the start and
//! the state it leads to. A [`ScriptPlayer`] walks it exactly once. Cues are
//! applied strictly in order, so a state can never be reached early, late,
//! out of order, or twice.

use serde::{Deserialize, Serialize};

use crate::instant::Millis;
use crate::numbers::millis_to_delay;

/// Steps of the full-screen farewell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndingPhase {
    #[default]
    Idle,
    FirstShown,
    FirstHidden,
    SecondShown,
    SecondHidden,
}

impl EndingPhase {
    /// Numeric step, 0 through 4.
    #[must_use]
    pub const fn step(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::FirstShown => 1,
            Self::FirstHidden => 2,
            Self::SecondShown => 3,
            Self::SecondHidden => 4,
        }
    }

    #[must_use]
    pub const fn first_visible(self) -> bool {
        matches!(self, Self::FirstShown)
    }

    #[must_use]
    pub const fn second_visible(self) -> bool {
        matches!(self, Self::SecondShown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue<S> {
    pub at_ms: u32,
    pub state: S,
}

impl<S> Cue<S> {
    pub const fn new(at_ms: u32, state: S) -> Self {
        Self { at_ms, state }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script<S> {
    cues: Vec<Cue<S>>,
}

impl<S: Copy> Script<S> {
    /// Build a script; `None` when empty or when offsets do not strictly increase.
    #[must_use]
    pub fn new(cues: Vec<Cue<S>>) -> Option<Self> {
        if cues.is_empty() || cues.windows(2).any(|pair| pair[0].at_ms >= pair[1].at_ms) {
            return None;
        }
        Some(Self { cues })
    }

    #[must_use]
    pub fn cues(&self) -> &[Cue<S>] {
        &self.cues
    }

    /// Offset of the final cue.
    #[must_use]
    pub fn span_ms(&self) -> u32 {
        self.cues.last().map_or(0, |cue| cue.at_ms)
    }
}

/// Plays a [`Script`] once against wall-clock instants.
#[derive(Debug, Clone)]
pub struct ScriptPlayer<S> {
    script: Script<S>,
    started_at: Millis,
    cursor: usize,
}

impl<S: Copy> ScriptPlayer<S> {
    /// Start at `now`, applying every cue scheduled at offset zero.
    pub fn start(script: Script<S>, now: Millis) -> (Self, Option<S>) {
        let mut player = Self {
            script,
            started_at: now,
            cursor: 0,
        };
        let state = player.advance(now);
        (player, state)
    }

    /// Apply every cue due by `now`, in order. Returns the latest state reached,
    /// or `None` when nothing new was due.
    pub fn advance(&mut self, now: Millis) -> Option<S> {
        let elapsed = now.saturating_sub(self.started_at);
        let mut reached = None;
        while let Some(cue) = self.script.cues.get(self.cursor) {
            if i64::from(cue.at_ms) > elapsed {
                break;
            }
            reached = Some(cue.state);
            self.cursor += 1;
        }
        reached
    }

    /// Delay from `now` until the next pending cue, if any remain.
    #[must_use]
    pub fn next_delay(&self, now: Millis) -> Option<u32> {
        let cue = self.script.cues.get(self.cursor)?;
        let due = self.started_at.saturating_add(i64::from(cue.at_ms));
        Some(millis_to_delay(due.saturating_sub(now)))
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.cursor >= self.script.cues.len()
    }

    #[must_use]
    pub const fn started_at(&self) -> Millis {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock() -> Script<EndingPhase> {
        Script::new(vec![
            Cue::new(0, EndingPhase::FirstShown),
            Cue::new(5_000, EndingPhase::FirstHidden),
            Cue::new(6_000, EndingPhase::SecondShown),
            Cue::new(11_000, EndingPhase::SecondHidden),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_empty_and_unordered_scripts() {
        assert!(Script::<u8>::new(Vec::new()).is_none());
        assert!(Script::new(vec![Cue::new(10, 1_u8), Cue::new(10, 2)]).is_none());
        assert!(Script::new(vec![Cue::new(10, 1_u8), Cue::new(5, 2)]).is_none());
        assert_eq!(stock().span_ms(), 11_000);
    }

    #[test]
    fn start_applies_zero_offset_cue() {
        let (player, first) = ScriptPlayer::start(stock(), 1_000);
        assert_eq!(first, Some(EndingPhase::FirstShown));
        assert_eq!(player.next_delay(1_000), Some(5_000));
    }

    #[test]
    fn advance_steps_in_order_and_only_once() {
        let (mut player, _) = ScriptPlayer::start(stock(), 0);
        assert_eq!(player.advance(4_999), None);
        assert_eq!(player.advance(5_000), Some(EndingPhase::FirstHidden));
        assert_eq!(player.advance(5_000), None);
        assert_eq!(player.next_delay(5_000), Some(1_000));
        assert_eq!(player.advance(6_000), Some(EndingPhase::SecondShown));
        assert_eq!(player.advance(11_500), Some(EndingPhase::SecondHidden));
        assert!(player.is_done());
        assert_eq!(player.next_delay(12_000), None);
        assert_eq!(player.advance(20_000), None);
    }

    #[test]
    fn late_wakeups_collapse_to_latest_cue() {
        let (mut player, _) = ScriptPlayer::start(stock(), 0);
        assert_eq!(player.advance(7_000), Some(EndingPhase::SecondShown));
        assert_eq!(player.next_delay(7_000), Some(4_000));
    }

    #[test]
    fn phase_visibility() {
        assert_eq!(EndingPhase::SecondHidden.step(), 4);
        assert!(EndingPhase::FirstShown.first_visible());
        assert!(!EndingPhase::FirstHidden.first_visible());
        assert!(EndingPhase::SecondShown.second_visible());
        assert!(!EndingPhase::Idle.second_visible());
    }
}
