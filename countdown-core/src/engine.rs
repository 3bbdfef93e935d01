//! The countdown state machine.
//!
//! [`Countdown`] owns every piece of widget state: the target, the latest
//! snapshot, the transient flags, the chime gate and the ending player. It
//! never reads a clock. Hosts pass the current instant into each operation and
//! carry out the returned [`Effect`]s.

use chrono::FixedOffset;

use crate::chime::ChimeGate;
use crate::config::{ChimeConfig, ConfigError, CountdownConfig, EndingConfig, TauntConfig, Variant};
use crate::effect::{Effect, Timer};
use crate::ending::{EndingPhase, Script, ScriptPlayer};
use crate::face::{CountingFace, DigitGroup, EndingFace, Face};
use crate::instant::{Millis, TargetInstant};
use crate::remaining::{FULL_UNITS, LAST_DAY_UNITS, Remaining};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Created but not mounted yet.
    Idle,
    Counting,
    Finished { at: Millis },
}

#[derive(Debug, Clone)]
pub struct Countdown {
    variant: Variant,
    target: TargetInstant,
    greeting: String,
    taunt: TauntConfig,
    chime: ChimeConfig,
    ending_text: EndingConfig,
    script: Script<EndingPhase>,
    status: Status,
    snapshot: Option<Remaining>,
    last_day: bool,
    shaking: bool,
    message: Option<String>,
    gate: ChimeGate,
    ending: Option<ScriptPlayer<EndingPhase>>,
    phase: EndingPhase,
    stop_presses: u32,
}

impl Countdown {
    /// Build an engine from configuration, resolving the target at `local_offset`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration is invalid or the
    /// target cannot be parsed.
    pub fn new(config: &CountdownConfig, local_offset: FixedOffset) -> Result<Self, ConfigError> {
        let target = config.target_instant(local_offset)?;
        Self::with_target(config, target)
    }

    /// Build an engine for an already resolved target.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration is invalid.
    pub fn with_target(config: &CountdownConfig, target: TargetInstant) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            variant: config.variant,
            target,
            greeting: config.greeting.clone(),
            taunt: config.taunt.clone(),
            chime: config.chime,
            ending_text: config.ending.clone(),
            script: config.ending.script()?,
            status: Status::Idle,
            snapshot: None,
            last_day: false,
            shaking: false,
            message: None,
            gate: ChimeGate::new(config.chime.min_gap_ms),
            ending: None,
            phase: EndingPhase::Idle,
            stop_presses: 0,
        })
    }

    /// Start counting. The face stays `Loading` until the first tick lands.
    pub fn mount(&mut self, _now: Millis) -> Vec<Effect> {
        if self.status != Status::Idle {
            return Vec::new();
        }
        self.status = Status::Counting;
        vec![Effect::StartTicker {
            period_ms: self.variant.tick_ms(),
        }]
    }

    /// Handle a timer the host scheduled on our behalf.
    pub fn fire(&mut self, timer: Timer, now: Millis) -> Vec<Effect> {
        match timer {
            Timer::Ticker => self.tick(now),
            Timer::TauntExpiry => {
                self.shaking = false;
                self.message = None;
                Vec::new()
            }
            Timer::EndingStep => self.step_ending(now),
        }
    }

    fn tick(&mut self, now: Millis) -> Vec<Effect> {
        if self.status != Status::Counting {
            return Vec::new();
        }
        let Some(remaining) = Remaining::from_millis(self.target.remaining_ms(now)) else {
            return self.finish(now);
        };
        self.refresh(remaining);
        let suppressed = !self.chime.enabled || self.last_day;
        if self.gate.admit(now, suppressed) {
            vec![Effect::Chime {
                frequency_hz: self.chime.frequency_hz,
                duration_ms: self.chime.duration_ms,
            }]
        } else {
            Vec::new()
        }
    }

    fn refresh(&mut self, remaining: Remaining) {
        self.snapshot = Some(remaining);
        self.last_day = self.variant.has_last_day() && remaining.is_last_day();
    }

    fn finish(&mut self, now: Millis) -> Vec<Effect> {
        self.status = Status::Finished { at: now };
        self.snapshot = Some(Remaining::ZERO);
        let mut effects = vec![Effect::StopTicker];
        if self.variant.has_ending() {
            let (player, first) = ScriptPlayer::start(self.script.clone(), now);
            if let Some(phase) = first {
                self.phase = phase;
            }
            if let Some(delay_ms) = player.next_delay(now) {
                effects.push(Effect::Schedule {
                    timer: Timer::EndingStep,
                    delay_ms,
                });
            }
            self.ending = Some(player);
        }
        effects
    }

    fn step_ending(&mut self, now: Millis) -> Vec<Effect> {
        let Some(player) = self.ending.as_mut() else {
            return Vec::new();
        };
        if let Some(phase) = player.advance(now) {
            self.phase = phase;
        }
        player
            .next_delay(now)
            .map(|delay_ms| Effect::Schedule {
                timer: Timer::EndingStep,
                delay_ms,
            })
            .into_iter()
            .collect()
    }

    /// The Stop button: shift the target a day, taunt, shake.
    ///
    /// Ignored once the ending sequence has taken over the screen. A finished
    /// basic clock still taunts, but its frozen zeros stay put.
    pub fn press_stop(&mut self, now: Millis) -> Vec<Effect> {
        if self.is_finished() && self.variant.has_ending() {
            return Vec::new();
        }
        self.target = self.target.shifted_by_days(self.taunt.penalty.day_shift());
        self.stop_presses = self.stop_presses.saturating_add(1);
        self.shaking = true;
        self.message = Some(self.taunt.message.clone());
        if self.status == Status::Counting
            && self.snapshot.is_some()
            && let Some(remaining) = Remaining::from_millis(self.target.remaining_ms(now))
        {
            self.refresh(remaining);
        }
        vec![Effect::Schedule {
            timer: Timer::TauntExpiry,
            delay_ms: self.taunt.duration_ms,
        }]
    }

    #[must_use]
    pub fn face(&self) -> Face {
        if self.is_finished() && self.variant.has_ending() {
            return Face::Ending(EndingFace::new(
                self.phase,
                &self.ending_text.first_text,
                &self.ending_text.second_text,
            ));
        }
        let Some(remaining) = self.snapshot else {
            return Face::Loading;
        };
        let units = if self.last_day {
            LAST_DAY_UNITS
        } else {
            FULL_UNITS
        };
        Face::Counting(CountingFace {
            greeting: self.greeting.clone(),
            digits: units
                .iter()
                .map(|unit| DigitGroup::read(&remaining, *unit))
                .collect(),
            urgent: self.last_day,
            shaking: self.shaking,
            message: self.message.clone(),
        })
    }

    #[must_use]
    pub const fn remaining_ms(&self, now: Millis) -> Millis {
        self.target.remaining_ms(now)
    }

    #[must_use]
    pub const fn target(&self) -> TargetInstant {
        self.target
    }

    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.status, Status::Finished { .. })
    }

    #[must_use]
    pub const fn snapshot(&self) -> Option<Remaining> {
        self.snapshot
    }

    #[must_use]
    pub const fn is_last_day(&self) -> bool {
        self.last_day
    }

    #[must_use]
    pub const fn is_shaking(&self) -> bool {
        self.shaking
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub const fn phase(&self) -> EndingPhase {
        self.phase
    }

    #[must_use]
    pub const fn stop_presses(&self) -> u32 {
        self.stop_presses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StopPenalty;
    use crate::constants::MILLIS_PER_DAY;
    use crate::remaining::Unit;

    const TARGET: Millis = 1_731_369_600_000;

    fn engine(variant: Variant) -> Countdown {
        let cfg = CountdownConfig {
            variant,
            ..CountdownConfig::default()
        };
        Countdown::with_target(&cfg, TargetInstant::from_millis(TARGET)).unwrap()
    }

    #[test]
    fn mount_requests_ticker_at_variant_cadence() {
        let mut basic = engine(Variant::Basic);
        assert_eq!(basic.mount(0), vec![Effect::StartTicker { period_ms: 1_000 }]);
        assert!(basic.mount(0).is_empty());
        let mut extended = engine(Variant::Extended);
        assert_eq!(extended.mount(0), vec![Effect::StartTicker { period_ms: 10 }]);
        assert_eq!(extended.face(), Face::Loading);
    }

    #[test]
    fn ticks_before_mount_are_ignored() {
        let mut cd = engine(Variant::Extended);
        assert!(cd.fire(Timer::Ticker, TARGET - 5_000).is_empty());
        assert_eq!(cd.face(), Face::Loading);
    }

    #[test]
    fn first_tick_chimes_and_renders() {
        let mut cd = engine(Variant::Extended);
        cd.mount(0);
        let now = TARGET - 2 * MILLIS_PER_DAY - 1_500;
        let effects = cd.fire(Timer::Ticker, now);
        assert!(effects.iter().any(Effect::is_chime));
        let face = cd.face();
        let counting = face.counting().unwrap();
        let units: Vec<Unit> = counting.digits.iter().map(|d| d.unit).collect();
        assert_eq!(units, FULL_UNITS.to_vec());
        assert_eq!(counting.digits[0].value, "02");
        assert_eq!(counting.greeting, "Ben...");
        assert!(!counting.urgent);
        assert!(cd.fire(Timer::Ticker, now + 10).is_empty());
    }

    #[test]
    fn last_day_switches_units_and_silences() {
        let mut cd = engine(Variant::Extended);
        cd.mount(0);
        let effects = cd.fire(Timer::Ticker, TARGET - 3_600_000);
        assert!(effects.is_empty());
        assert!(cd.is_last_day());
        let face = cd.face();
        let counting = face.counting().unwrap();
        assert!(counting.urgent);
        assert_eq!(counting.digits[3].unit, Unit::Hundredths);
        assert_eq!(counting.digits[0].value, "01");
    }

    #[test]
    fn basic_variant_has_no_last_day() {
        let mut cd = engine(Variant::Basic);
        cd.mount(0);
        let effects = cd.fire(Timer::Ticker, TARGET - 3_600_000);
        assert!(effects.iter().any(Effect::is_chime));
        assert!(!cd.is_last_day());
        assert_eq!(cd.face().counting().unwrap().digits[0].unit, Unit::Days);
    }

    #[test]
    fn reaching_zero_stops_ticker_and_starts_ending() {
        let mut cd = engine(Variant::Extended);
        cd.mount(0);
        let effects = cd.fire(Timer::Ticker, TARGET);
        assert_eq!(
            effects,
            vec![
                Effect::StopTicker,
                Effect::Schedule {
                    timer: Timer::EndingStep,
                    delay_ms: 5_000
                }
            ]
        );
        assert_eq!(cd.snapshot(), Some(Remaining::ZERO));
        assert_eq!(cd.phase(), EndingPhase::FirstShown);
        assert!(cd.fire(Timer::Ticker, TARGET + 10).is_empty());
        assert_eq!(
            cd.face().ending().unwrap().visible_text(),
            Some("Execute decom protocol alpha...")
        );
    }

    #[test]
    fn basic_finish_freezes_on_zero() {
        let mut cd = engine(Variant::Basic);
        cd.mount(0);
        assert_eq!(cd.fire(Timer::Ticker, TARGET + 1), vec![Effect::StopTicker]);
        let face = cd.face();
        let counting = face.counting().unwrap();
        assert!(counting.digits.iter().all(|d| d.value == "00"));
        assert!(cd.fire(Timer::EndingStep, TARGET + 6_000).is_empty());
        assert_eq!(cd.phase(), EndingPhase::Idle);
    }

    #[test]
    fn stop_shifts_target_and_taunts() {
        let mut cd = engine(Variant::Extended);
        cd.mount(0);
        let now = TARGET - 10 * MILLIS_PER_DAY;
        cd.fire(Timer::Ticker, now);
        let before = cd.remaining_ms(now);
        let effects = cd.press_stop(now);
        assert_eq!(
            effects,
            vec![Effect::Schedule {
                timer: Timer::TauntExpiry,
                delay_ms: 3_000
            }]
        );
        assert_eq!(before - cd.remaining_ms(now), MILLIS_PER_DAY);
        assert!(cd.is_shaking());
        assert_eq!(cd.message(), Some("Failed to stop, - 1 day"));
        assert_eq!(cd.face().counting().unwrap().digits[0].value, "09");

        assert!(cd.fire(Timer::TauntExpiry, now + 3_000).is_empty());
        assert!(!cd.is_shaking());
        assert_eq!(cd.message(), None);
        assert_eq!(cd.stop_presses(), 1);
    }

    #[test]
    fn postpone_penalty_lengthens_countdown() {
        let cfg = CountdownConfig {
            taunt: TauntConfig {
                penalty: StopPenalty::Postpone,
                ..TauntConfig::default()
            },
            ..CountdownConfig::default()
        };
        let mut cd = Countdown::with_target(&cfg, TargetInstant::from_millis(TARGET)).unwrap();
        let now = TARGET - 5_000;
        let before = cd.remaining_ms(now);
        cd.press_stop(now);
        assert_eq!(cd.remaining_ms(now) - before, MILLIS_PER_DAY);
    }

    #[test]
    fn stop_after_finish_is_ignored() {
        let mut cd = engine(Variant::Extended);
        cd.mount(0);
        cd.fire(Timer::Ticker, TARGET);
        let target = cd.target();
        assert!(cd.press_stop(TARGET + 1).is_empty());
        assert_eq!(cd.target(), target);
        assert!(!cd.is_shaking());
    }

    #[test]
    fn stop_after_basic_finish_still_taunts() {
        let mut cd = engine(Variant::Basic);
        cd.mount(0);
        cd.fire(Timer::Ticker, TARGET);
        assert!(cd.is_finished());
        let target = cd.target();
        let effects = cd.press_stop(TARGET + 500);
        assert_eq!(
            effects,
            vec![Effect::Schedule {
                timer: Timer::TauntExpiry,
                delay_ms: 3_000
            }]
        );
        assert_eq!(cd.target().as_millis(), target.as_millis() - MILLIS_PER_DAY);
        let face = cd.face();
        let counting = face.counting().unwrap();
        assert!(counting.shaking);
        assert_eq!(counting.message.as_deref(), Some("Failed to stop, - 1 day"));
        assert!(counting.digits.iter().all(|d| d.value == "00"));

        cd.fire(Timer::TauntExpiry, TARGET + 3_500);
        assert!(!cd.is_shaking());
        assert!(cd.is_finished());
    }

    #[test]
    fn postponed_stop_after_basic_finish_keeps_zeros() {
        let cfg = CountdownConfig {
            variant: Variant::Basic,
            taunt: TauntConfig {
                penalty: StopPenalty::Postpone,
                ..TauntConfig::default()
            },
            ..CountdownConfig::default()
        };
        let mut cd = Countdown::with_target(&cfg, TargetInstant::from_millis(TARGET)).unwrap();
        cd.mount(0);
        cd.fire(Timer::Ticker, TARGET);
        cd.press_stop(TARGET + 500);
        assert!(cd.remaining_ms(TARGET + 500) > 0);
        assert_eq!(cd.snapshot(), Some(Remaining::ZERO));
        assert!(cd.fire(Timer::Ticker, TARGET + 1_000).is_empty());
    }

    #[test]
    fn new_resolves_target_text() {
        let cfg = CountdownConfig {
            target: "2024-11-12T00:00:00Z".into(),
            ..CountdownConfig::default()
        };
        let cd = Countdown::new(&cfg, crate::instant::utc_offset()).unwrap();
        assert_eq!(cd.target().as_millis(), TARGET);
        let bad = CountdownConfig {
            target: "soon".into(),
            ..CountdownConfig::default()
        };
        assert!(Countdown::new(&bad, crate::instant::utc_offset()).is_err());
    }
}
