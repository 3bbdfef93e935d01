//! Scripted scenarios played against the engine on a virtual clock.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use countdown_core::constants::MILLIS_PER_DAY;
use countdown_core::{
    Countdown, CountdownConfig, EndingPhase, Face, LAST_DAY_UNITS, Millis, Simulation,
    TargetInstant, Variant, utc_offset,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub variant: String,
    pub passed: bool,
    pub checks_run: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

type Check = fn(&CountdownConfig, TargetInstant, &mut Checks);

pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    /// Scenarios that only make sense for one variant pin it here.
    pub variant: Option<Variant>,
    check: Check,
}

pub static CATALOG: [Scenario; 6] = [
    Scenario {
        key: "smoke",
        description: "Mount, first tick, digit layout and chime spacing",
        variant: None,
        check: smoke,
    },
    Scenario {
        key: "stop-penalty",
        description: "Stop shifts the remaining time by one day and taunts for the configured span",
        variant: None,
        check: stop_penalty,
    },
    Scenario {
        key: "stop-repeat",
        description: "Repeated Stop presses stack penalties and clear after the last press",
        variant: None,
        check: stop_repeat,
    },
    Scenario {
        key: "last-day",
        description: "Crossing into the final day switches units and silences the chime",
        variant: Some(Variant::Extended),
        check: last_day,
    },
    Scenario {
        key: "finale",
        description: "Reaching zero plays the ending script in order and ignores Stop",
        variant: Some(Variant::Extended),
        check: finale,
    },
    Scenario {
        key: "basic-finish",
        description: "The basic clock freezes at zero, never ticks again, and still taunts on Stop",
        variant: Some(Variant::Basic),
        check: basic_finish,
    },
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG.iter().map(|s| (s.key, s.description)).collect()
}

#[must_use]
pub fn find_scenario(key: &str) -> Option<&'static Scenario> {
    CATALOG.iter().find(|s| s.key == key)
}

impl Scenario {
    /// Run against `base`, overriding its variant when this scenario pins one.
    ///
    /// # Errors
    ///
    /// Fails when the configuration cannot produce an engine.
    pub fn run(&self, base: &CountdownConfig) -> Result<ScenarioResult> {
        let mut cfg = base.clone();
        if let Some(variant) = self.variant {
            cfg.variant = variant;
        }
        let target = cfg
            .target_instant(utc_offset())
            .with_context(|| format!("scenario {} could not resolve its target", self.key))?;
        let started = Instant::now();
        let mut checks = Checks::default();
        (self.check)(&cfg, target, &mut checks);
        log::debug!(
            "{} ({}) ran {} checks",
            self.key,
            cfg.variant.key(),
            checks.run
        );
        Ok(ScenarioResult {
            scenario_name: self.key.to_string(),
            variant: cfg.variant.key().to_string(),
            passed: checks.failures.is_empty(),
            checks_run: checks.run,
            failures: checks.failures,
            duration: started.elapsed(),
        })
    }
}

#[derive(Debug, Default)]
pub struct Checks {
    run: usize,
    failures: Vec<String>,
}

impl Checks {
    fn ensure(&mut self, ok: bool, describe: impl FnOnce() -> String) {
        self.run += 1;
        if !ok {
            self.failures.push(describe());
        }
    }

    fn fail(&mut self, message: String) {
        self.run += 1;
        self.failures.push(message);
    }
}

fn start(
    cfg: &CountdownConfig,
    target: TargetInstant,
    at: Millis,
    checks: &mut Checks,
) -> Option<Simulation> {
    match Countdown::with_target(cfg, target) {
        Ok(countdown) => {
            let mut sim = Simulation::new(countdown, at);
            sim.mount();
            Some(sim)
        }
        Err(err) => {
            checks.fail(format!("engine rejected the configuration: {err}"));
            None
        }
    }
}

fn smoke(cfg: &CountdownConfig, target: TargetInstant, checks: &mut Checks) {
    let t = target.as_millis();
    let begin = t - 2 * MILLIS_PER_DAY - 5_000;
    let Some(mut sim) = start(cfg, target, begin, checks) else {
        return;
    };
    checks.ensure(sim.face() == Face::Loading, || {
        "face should read Loading before the first tick".into()
    });

    sim.run_for(i64::from(cfg.variant.tick_ms()));
    match sim.face().counting() {
        Some(face) => checks.ensure(face.digits.len() == 4 && !face.urgent, || {
            format!("expected four calm digit groups, got {}", sim.face().summary())
        }),
        None => checks.fail(format!("expected a counting face, got {}", sim.face().summary())),
    }
    if let Some(snapshot) = sim.countdown().snapshot() {
        let gap = (t - sim.now()) - snapshot.as_millis();
        checks.ensure((0..i64::from(cfg.variant.tick_ms())).contains(&gap), || {
            format!("snapshot drifted {gap} ms from the true remaining time")
        });
    }

    sim.run_for(5_000);
    let chimes = &sim.trace().chimes;
    if cfg.chime.enabled {
        checks.ensure(!chimes.is_empty(), || "no chime sounded in five seconds".into());
    }
    let gap = i64::from(cfg.chime.min_gap_ms);
    checks.ensure(chimes.windows(2).all(|w| w[1] - w[0] >= gap), || {
        format!("chimes closer than {gap} ms: {chimes:?}")
    });
}

fn stop_penalty(cfg: &CountdownConfig, target: TargetInstant, checks: &mut Checks) {
    let Some(mut sim) = start(cfg, target, target.as_millis() - 10 * MILLIS_PER_DAY, checks) else {
        return;
    };
    sim.run_for(2_000);
    sim.press_stop();

    let Some(record) = sim.trace().stops.first().copied() else {
        checks.fail("Stop produced no effect".into());
        return;
    };
    let expected = cfg.taunt.penalty.day_shift() * MILLIS_PER_DAY;
    let shift = record.remaining_after - record.remaining_before;
    checks.ensure(shift == expected, || {
        format!("remaining moved {shift} ms, expected {expected} ms")
    });
    checks.ensure(
        sim.countdown().is_shaking()
            && sim.countdown().message() == Some(cfg.taunt.message.as_str()),
        || "taunt should show immediately after Stop".into(),
    );

    let shifted = sim.countdown().target();
    let span = i64::from(cfg.taunt.duration_ms);
    sim.run_until(record.at + span - 1);
    checks.ensure(sim.countdown().is_shaking(), || {
        format!("taunt cleared before {span} ms elapsed")
    });
    sim.run_until(record.at + span);
    checks.ensure(
        !sim.countdown().is_shaking() && sim.countdown().message().is_none(),
        || format!("taunt still visible {span} ms after Stop"),
    );
    checks.ensure(sim.countdown().target() == shifted, || {
        "taunt expiry must not move the target".into()
    });
}

fn stop_repeat(cfg: &CountdownConfig, target: TargetInstant, checks: &mut Checks) {
    let Some(mut sim) = start(cfg, target, target.as_millis() - 10 * MILLIS_PER_DAY, checks) else {
        return;
    };
    sim.run_for(1_000);
    let original = sim.countdown().target().as_millis();
    for _ in 0..3 {
        sim.press_stop();
        sim.run_for(1_000);
    }
    let last_press = sim.now() - 1_000;
    let moved = sim.countdown().target().as_millis() - original;
    let expected = 3 * cfg.taunt.penalty.day_shift() * MILLIS_PER_DAY;
    checks.ensure(moved == expected, || {
        format!("three presses moved the target {moved} ms, expected {expected} ms")
    });

    let span = i64::from(cfg.taunt.duration_ms);
    sim.run_until(last_press + span - 1);
    checks.ensure(sim.countdown().is_shaking(), || {
        "taunt cleared early after repeated presses".into()
    });
    sim.run_until(last_press + span);
    checks.ensure(!sim.countdown().is_shaking(), || {
        format!("taunt still visible {span} ms after the last press")
    });
    checks.ensure(sim.countdown().stop_presses() == 3, || {
        format!("counted {} presses", sim.countdown().stop_presses())
    });
}

fn last_day(cfg: &CountdownConfig, target: TargetInstant, checks: &mut Checks) {
    let t = target.as_millis();
    let Some(mut sim) = start(cfg, target, t - MILLIS_PER_DAY - 500, checks) else {
        return;
    };
    sim.run_for(100);
    checks.ensure(!sim.countdown().is_last_day(), || {
        "last-day mode engaged a full day out".into()
    });

    sim.run_until(t - MILLIS_PER_DAY + 2_500);
    checks.ensure(sim.countdown().is_last_day(), || {
        "last-day mode did not engage".into()
    });
    match sim.face().counting() {
        Some(face) => {
            let units: Vec<_> = face.digits.iter().map(|d| d.unit).collect();
            checks.ensure(units == LAST_DAY_UNITS, || {
                format!("last-day units were {units:?}")
            });
            checks.ensure(face.urgent, || "last-day digits should be urgent".into());
        }
        None => checks.fail(format!("expected a counting face, got {}", sim.face().summary())),
    }
    let crossing = t - MILLIS_PER_DAY;
    let late: Vec<Millis> = sim
        .trace()
        .chimes
        .iter()
        .copied()
        .filter(|at| *at >= crossing)
        .collect();
    checks.ensure(late.is_empty(), || {
        format!("chime sounded during the last day at {late:?}")
    });
}

fn finale(cfg: &CountdownConfig, target: TargetInstant, checks: &mut Checks) {
    let t = target.as_millis();
    let Some(mut sim) = start(cfg, target, t - 50, checks) else {
        return;
    };
    let ending = &cfg.ending;
    sim.run_until(t + i64::from(ending.second_hide_ms) + 1_000);
    sim.press_stop();
    sim.run_for(5_000);

    let trace = sim.trace();
    checks.ensure(trace.finished_at == Some(t), || {
        format!("finished at {:?}, expected {t}", trace.finished_at)
    });
    let expected = vec![
        (t, EndingPhase::FirstShown),
        (t + i64::from(ending.first_hide_ms), EndingPhase::FirstHidden),
        (t + i64::from(ending.second_show_ms), EndingPhase::SecondShown),
        (t + i64::from(ending.second_hide_ms), EndingPhase::SecondHidden),
    ];
    checks.ensure(trace.phases == expected, || {
        format!("ending phases were {:?}", trace.phases)
    });
    checks.ensure(trace.stops.is_empty(), || "Stop after zero was honoured".into());
    checks.ensure(trace.ticks_after_finish == 0, || {
        format!("{} ticks landed after zero", trace.ticks_after_finish)
    });
    checks.ensure(sim.countdown().target() == target, || {
        "target moved after the countdown finished".into()
    });
}

fn basic_finish(cfg: &CountdownConfig, target: TargetInstant, checks: &mut Checks) {
    let t = target.as_millis();
    let Some(mut sim) = start(cfg, target, t - 3_500, checks) else {
        return;
    };
    sim.run_until(t + 30_000);
    let trace = sim.trace();
    checks.ensure(trace.finished_at == Some(t + 500), || {
        format!("finished at {:?}, expected {}", trace.finished_at, t + 500)
    });
    checks.ensure(trace.ticks_after_finish == 0, || {
        format!("{} ticks landed after zero", trace.ticks_after_finish)
    });
    checks.ensure(trace.phases.is_empty(), || {
        format!("basic clock played an ending: {:?}", trace.phases)
    });
    match sim.face().counting() {
        Some(face) => checks.ensure(face.digits.iter().all(|d| d.value == "00"), || {
            format!("frozen face should read zero, got {}", sim.face().summary())
        }),
        None => checks.fail(format!("expected a frozen counting face, got {}", sim.face().summary())),
    }

    let pressed_at = sim.now();
    sim.press_stop();
    checks.ensure(sim.trace().stops.len() == 1, || {
        "Stop on the frozen clock produced no effect".into()
    });
    checks.ensure(
        sim.countdown().is_shaking()
            && sim.countdown().message() == Some(cfg.taunt.message.as_str()),
        || "frozen clock should still taunt".into(),
    );
    sim.run_until(pressed_at + i64::from(cfg.taunt.duration_ms));
    checks.ensure(!sim.countdown().is_shaking(), || {
        "taunt on the frozen clock never cleared".into()
    });
    checks.ensure(sim.trace().ticks_after_finish == 0, || {
        "Stop restarted the frozen clock".into()
    });
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
