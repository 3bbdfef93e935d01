use countdown_core::constants::{MILLIS_PER_DAY, MILLIS_PER_HUNDREDTH};
use countdown_core::{
    Countdown, CountdownConfig, EndingPhase, Face, LAST_DAY_UNITS, Millis, Remaining, Simulation,
    StopPenalty, TargetInstant, TauntConfig, Timer, Unit, Variant,
};

const TARGET: Millis = 1_731_369_600_000;

fn config(variant: Variant) -> CountdownConfig {
    CountdownConfig {
        variant,
        ..CountdownConfig::default()
    }
}

fn simulation(variant: Variant, start: Millis) -> Simulation {
    let countdown =
        Countdown::with_target(&config(variant), TargetInstant::from_millis(TARGET)).unwrap();
    let mut sim = Simulation::new(countdown, start);
    sim.mount();
    sim
}

#[test]
fn snapshots_reconstruct_remaining_time() {
    for offset in [15, 1_234, 59_999, 3_600_001, MILLIS_PER_DAY + 7, 30 * MILLIS_PER_DAY + 86_399] {
        let mut sim = simulation(Variant::Extended, TARGET - offset - 10);
        sim.run_for(10);
        let snapshot = sim.countdown().snapshot().expect("ticked once");
        let diff = TARGET - sim.now();
        let gap = diff - snapshot.as_millis();
        assert!(
            (0..MILLIS_PER_HUNDREDTH).contains(&gap),
            "offset {offset}: gap {gap}"
        );
        assert_eq!(Remaining::from_millis(diff), Some(snapshot));
    }
}

#[test]
fn loading_until_first_tick() {
    let mut sim = simulation(Variant::Basic, TARGET - 10_000);
    assert_eq!(sim.face(), Face::Loading);
    sim.run_for(999);
    assert_eq!(sim.face(), Face::Loading);
    sim.run_for(1);
    assert!(sim.face().counting().is_some());
}

#[test]
fn ticker_stops_permanently_at_zero() {
    let mut sim = simulation(Variant::Basic, TARGET - 3_500);
    sim.run_until(TARGET + 30_000);
    let trace = sim.trace();
    assert_eq!(trace.finished_at, Some(TARGET + 500));
    assert_eq!(trace.ticks, 4);
    assert_eq!(trace.ticks_after_finish, 0);
    assert!(!sim.timeline().is_pending(Timer::Ticker));
    assert_eq!(sim.countdown().snapshot(), Some(Remaining::ZERO));
    let face = sim.face();
    let counting = face.counting().expect("basic variant keeps the digits");
    assert!(counting.digits.iter().all(|group| group.value == "00"));
}

#[test]
fn stop_on_a_frozen_basic_clock_taunts_without_ticking() {
    let mut sim = simulation(Variant::Basic, TARGET - 3_500);
    sim.run_until(TARGET + 2_000);
    let target = sim.countdown().target();
    sim.press_stop();
    let trace = sim.trace();
    assert_eq!(trace.stops.len(), 1);
    assert_eq!(
        trace.stops[0].remaining_before - trace.stops[0].remaining_after,
        MILLIS_PER_DAY
    );
    assert_eq!(
        sim.countdown().target().as_millis(),
        target.as_millis() - MILLIS_PER_DAY
    );
    let face = sim.face();
    let counting = face.counting().expect("basic variant keeps the digits");
    assert!(counting.shaking);
    assert!(counting.message.is_some());
    assert!(counting.digits.iter().all(|group| group.value == "00"));

    sim.run_until(TARGET + 5_000);
    assert_eq!(sim.trace().taunt_cleared, vec![TARGET + 5_000]);
    assert!(!sim.countdown().is_shaking());
    assert_eq!(sim.trace().ticks_after_finish, 0);
    assert!(!sim.timeline().is_pending(Timer::Ticker));
}

#[test]
fn stop_moves_target_by_exactly_one_day() {
    let mut sim = simulation(Variant::Extended, TARGET - 20 * MILLIS_PER_DAY);
    for _ in 0..5 {
        sim.run_for(700);
        sim.press_stop();
    }
    let stops = &sim.trace().stops;
    assert_eq!(stops.len(), 5);
    for stop in stops {
        assert_eq!(stop.remaining_before - stop.remaining_after, MILLIS_PER_DAY);
    }
    assert_eq!(
        sim.countdown().target().as_millis(),
        TARGET - 5 * MILLIS_PER_DAY
    );
}

#[test]
fn postponing_stop_never_shortens_the_countdown() {
    let cfg = CountdownConfig {
        taunt: TauntConfig {
            penalty: StopPenalty::Postpone,
            ..TauntConfig::default()
        },
        ..CountdownConfig::default()
    };
    let countdown = Countdown::with_target(&cfg, TargetInstant::from_millis(TARGET)).unwrap();
    let mut sim = Simulation::new(countdown, TARGET - 2_000);
    sim.mount();
    sim.run_for(500);
    sim.press_stop();
    sim.run_for(2_000);
    let stop = sim.trace().stops[0];
    assert_eq!(stop.remaining_after - stop.remaining_before, MILLIS_PER_DAY);
    assert!(!sim.countdown().is_finished());
}

#[test]
fn taunt_clears_exactly_three_seconds_later() {
    let mut sim = simulation(Variant::Extended, TARGET - 10 * MILLIS_PER_DAY);
    sim.run_for(100);
    let pressed_at = sim.now();
    sim.press_stop();
    assert!(sim.countdown().is_shaking());
    assert_eq!(sim.countdown().message(), Some("Failed to stop, - 1 day"));

    sim.run_until(pressed_at + 2_999);
    assert!(sim.countdown().is_shaking());
    let target = sim.countdown().target();

    sim.run_until(pressed_at + 3_000);
    assert!(!sim.countdown().is_shaking());
    assert_eq!(sim.countdown().message(), None);
    assert_eq!(sim.trace().taunt_cleared, vec![pressed_at + 3_000]);
    assert_eq!(sim.countdown().target(), target);
    assert_eq!(sim.countdown().phase(), EndingPhase::Idle);
}

#[test]
fn repeated_presses_extend_the_taunt() {
    let mut sim = simulation(Variant::Extended, TARGET - 10 * MILLIS_PER_DAY);
    sim.press_stop();
    sim.run_for(1_000);
    sim.press_stop();
    let second = sim.now();
    sim.run_until(second + 2_500);
    assert!(sim.countdown().is_shaking());
    sim.run_until(second + 3_000);
    assert_eq!(sim.trace().taunt_cleared, vec![second + 3_000]);
    assert_eq!(sim.countdown().stop_presses(), 2);
}

#[test]
fn last_day_switches_units_and_silences_ticks() {
    let start = TARGET - MILLIS_PER_DAY - 2_000;
    let mut sim = simulation(Variant::Extended, start);
    sim.run_for(4_000);
    assert_eq!(sim.trace().chimes, vec![start + 10, start + 1_010]);
    assert!(sim.countdown().is_last_day());
    let face = sim.face();
    let counting = face.counting().unwrap();
    let units: Vec<Unit> = counting.digits.iter().map(|group| group.unit).collect();
    assert_eq!(units, LAST_DAY_UNITS.to_vec());
    assert!(counting.urgent);
    assert_eq!(counting.digits[0].value, "23");
}

#[test]
fn chimes_respect_the_minimum_gap() {
    let mut sim = simulation(Variant::Extended, TARGET - 10 * MILLIS_PER_DAY);
    sim.run_for(10_000);
    let chimes = &sim.trace().chimes;
    assert_eq!(chimes.len(), 10);
    assert!(chimes.windows(2).all(|pair| pair[1] - pair[0] >= 1_000));
}

#[test]
fn ending_phases_fire_on_schedule() {
    let mut sim = simulation(Variant::Extended, TARGET - 50);
    sim.run_until(TARGET + 20_000);
    let trace = sim.trace();
    assert_eq!(trace.finished_at, Some(TARGET));
    assert_eq!(
        trace.phases,
        vec![
            (TARGET, EndingPhase::FirstShown),
            (TARGET + 5_000, EndingPhase::FirstHidden),
            (TARGET + 6_000, EndingPhase::SecondShown),
            (TARGET + 11_000, EndingPhase::SecondHidden),
        ]
    );
    let steps: Vec<u8> = trace.phases.iter().map(|(_, phase)| phase.step()).collect();
    assert!(steps.windows(2).all(|pair| pair[1] == pair[0] + 1));
    assert!(!sim.timeline().is_pending(Timer::EndingStep));
    assert_eq!(sim.face().ending().unwrap().visible_text(), None);
}

#[test]
fn ending_face_shows_each_line_in_turn() {
    let mut sim = simulation(Variant::Extended, TARGET - 10);
    sim.run_until(TARGET + 1);
    assert_eq!(
        sim.face().ending().unwrap().visible_text(),
        Some("Execute decom protocol alpha...")
    );
    sim.run_until(TARGET + 5_500);
    assert_eq!(sim.face().ending().unwrap().visible_text(), None);
    sim.run_until(TARGET + 6_000);
    assert_eq!(
        sim.face().ending().unwrap().visible_text(),
        Some("Goodbye Ben...")
    );
}

#[test]
fn stop_can_push_the_countdown_over_the_edge() {
    let mut sim = simulation(Variant::Extended, TARGET - MILLIS_PER_DAY + 5_000);
    sim.run_for(100);
    sim.press_stop();
    sim.run_for(10);
    assert!(sim.countdown().is_finished());
    assert_eq!(sim.countdown().phase(), EndingPhase::FirstShown);
}

#[test]
fn unmount_cancels_every_timer() {
    let mut sim = simulation(Variant::Extended, TARGET - 10_000);
    sim.run_for(50);
    sim.press_stop();
    sim.unmount();
    let ticks = sim.trace().ticks;
    sim.run_for(60_000);
    assert_eq!(sim.trace().ticks, ticks);
    assert!(sim.trace().taunt_cleared.is_empty());
    assert!(sim.countdown().is_shaking());
}
