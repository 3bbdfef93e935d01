//! Deterministic virtual-time host for the engine.
//!
//! [`Timeline`] stands in for the browser's timer registry: one pending slot
//! per [`Timer`], with repeating and one-shot entries. [`Simulation`] wires a
//! [`Countdown`] to it the same way the web component wires it to real
//! browser timers, and records what happened in a [`Trace`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::effect::{Effect, Timer};
use crate::ending::EndingPhase;
use crate::engine::Countdown;
use crate::face::Face;
use crate::instant::Millis;

#[derive(Debug, Clone, Copy)]
struct Slot {
    due: Millis,
    seq: u64,
    period_ms: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    now: Millis,
    seq: u64,
    queue: BTreeMap<(Millis, u64), Timer>,
    slots: HashMap<Timer, Slot>,
}

impl Timeline {
    #[must_use]
    pub fn new(start: Millis) -> Self {
        Self {
            now: start,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn now(&self) -> Millis {
        self.now
    }

    /// Repeat `timer` every `period_ms`, replacing any pending entry of that kind.
    pub fn every(&mut self, timer: Timer, period_ms: u32) {
        let period_ms = period_ms.max(1);
        self.insert(timer, self.now + i64::from(period_ms), Some(period_ms));
    }

    /// Fire `timer` once after `delay_ms`, replacing any pending entry of that kind.
    pub fn after(&mut self, timer: Timer, delay_ms: u32) {
        self.insert(timer, self.now + i64::from(delay_ms), None);
    }

    /// Drop the pending entry for `timer`; returns whether one existed.
    pub fn cancel(&mut self, timer: Timer) -> bool {
        self.slots
            .remove(&timer)
            .map(|slot| self.queue.remove(&(slot.due, slot.seq)))
            .is_some()
    }

    #[must_use]
    pub fn is_pending(&self, timer: Timer) -> bool {
        self.slots.contains_key(&timer)
    }

    /// Nothing left to fire.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.slots.is_empty()
    }

    /// Pop the earliest entry due at or before `until`, moving the clock to it.
    /// Repeating entries are re-armed one period later.
    pub fn pop_due(&mut self, until: Millis) -> Option<(Millis, Timer)> {
        let (&(due, seq), &timer) = self.queue.first_key_value()?;
        if due > until {
            return None;
        }
        self.queue.remove(&(due, seq));
        self.now = due;
        let slot = self.slots.remove(&timer);
        if let Some(period_ms) = slot.and_then(|slot| slot.period_ms) {
            self.insert(timer, due + i64::from(period_ms), Some(period_ms));
        }
        Some((due, timer))
    }

    /// Move the clock forward without firing anything.
    pub fn advance_to(&mut self, until: Millis) {
        self.now = self.now.max(until);
    }

    /// Cancel everything, as a host does on teardown.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.slots.clear();
    }

    fn insert(&mut self, timer: Timer, due: Millis, period_ms: Option<u32>) {
        self.cancel(timer);
        self.seq += 1;
        let seq = self.seq;
        self.queue.insert((due, seq), timer);
        self.slots.insert(
            timer,
            Slot {
                due,
                seq,
                period_ms,
            },
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRecord {
    pub at: Millis,
    pub remaining_before: Millis,
    pub remaining_after: Millis,
}

/// Everything observable that happened during a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub ticks: u64,
    pub chimes: Vec<Millis>,
    pub stops: Vec<StopRecord>,
    pub taunt_cleared: Vec<Millis>,
    pub finished_at: Option<Millis>,
    pub phases: Vec<(Millis, EndingPhase)>,
    /// Ticker firings observed after the countdown finished; should stay zero.
    pub ticks_after_finish: u64,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    countdown: Countdown,
    timeline: Timeline,
    trace: Trace,
}

impl Simulation {
    #[must_use]
    pub fn new(countdown: Countdown, start: Millis) -> Self {
        Self {
            countdown,
            timeline: Timeline::new(start),
            trace: Trace::default(),
        }
    }

    /// Mount the engine at the current virtual instant.
    pub fn mount(&mut self) {
        let effects = self.countdown.mount(self.timeline.now());
        self.apply(&effects);
    }

    /// Press Stop at the current virtual instant.
    pub fn press_stop(&mut self) {
        let now = self.timeline.now();
        let remaining_before = self.countdown.remaining_ms(now);
        let effects = self.countdown.press_stop(now);
        if !effects.is_empty() {
            self.trace.stops.push(StopRecord {
                at: now,
                remaining_before,
                remaining_after: self.countdown.remaining_ms(now),
            });
        }
        self.apply(&effects);
    }

    /// Fire every timer due up to and including `until`.
    pub fn run_until(&mut self, until: Millis) {
        while let Some((at, timer)) = self.timeline.pop_due(until) {
            self.dispatch(at, timer);
        }
        self.timeline.advance_to(until);
    }

    pub fn run_for(&mut self, span_ms: Millis) {
        self.run_until(self.timeline.now() + span_ms);
    }

    /// Tear down: every pending timer is cancelled.
    pub fn unmount(&mut self) {
        self.timeline.clear();
    }

    fn dispatch(&mut self, at: Millis, timer: Timer) {
        let was_finished = self.countdown.is_finished();
        let phase_before = self.countdown.phase();
        match timer {
            Timer::Ticker if was_finished => self.trace.ticks_after_finish += 1,
            Timer::Ticker => self.trace.ticks += 1,
            Timer::TauntExpiry => self.trace.taunt_cleared.push(at),
            Timer::EndingStep => {}
        }
        let effects = self.countdown.fire(timer, at);
        if !was_finished && self.countdown.is_finished() {
            self.trace.finished_at = Some(at);
        }
        let phase_after = self.countdown.phase();
        if phase_after != phase_before {
            self.trace.phases.push((at, phase_after));
        }
        self.apply(&effects);
    }

    fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            match *effect {
                Effect::StartTicker { period_ms } => self.timeline.every(Timer::Ticker, period_ms),
                Effect::StopTicker => {
                    self.timeline.cancel(Timer::Ticker);
                }
                Effect::Schedule { timer, delay_ms } => self.timeline.after(timer, delay_ms),
                Effect::Chime { .. } => self.trace.chimes.push(self.timeline.now()),
            }
        }
    }

    #[must_use]
    pub const fn now(&self) -> Millis {
        self.timeline.now()
    }

    #[must_use]
    pub const fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    #[must_use]
    pub const fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[must_use]
    pub const fn trace(&self) -> &Trace {
        &self.trace
    }

    #[must_use]
    pub fn face(&self) -> Face {
        self.countdown.face()
    }
}
