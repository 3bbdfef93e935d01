//! Live terminal view: the engine against the system clock.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use colored::Colorize;
use countdown_core::{Countdown, CountdownConfig, Face, Millis, Simulation};

/// Drive the countdown in real time for `seconds`, printing the face once a second.
///
/// Returns early once an ending sequence has fully played out.
pub async fn watch(cfg: &CountdownConfig, seconds: u64) -> Result<()> {
    let offset = *Local::now().offset();
    let countdown = Countdown::new(cfg, offset).context("could not build the countdown")?;
    let tick_ms = cfg.variant.tick_ms();
    let mut sim = Simulation::new(countdown, wall_clock());
    sim.mount();
    log::info!(
        "watching {} countdown to {} for {seconds}s",
        cfg.variant.key(),
        sim.countdown().target().as_millis()
    );

    let deadline = deadline_after(sim.now(), seconds);
    let mut ticker = tokio::time::interval(Duration::from_millis(u64::from(tick_ms)));
    let mut last_print: Option<Millis> = None;
    loop {
        ticker.tick().await;
        let now = wall_clock().min(deadline);
        sim.run_until(now);
        if last_print.is_none_or(|at| now - at >= 1_000) {
            println!("{}", render(&sim.face()));
            last_print = Some(now);
        }
        if now >= deadline || ending_complete(&sim) {
            break;
        }
    }
    sim.unmount();
    Ok(())
}

fn deadline_after(now: Millis, seconds: u64) -> Millis {
    let span = Millis::try_from(seconds.saturating_mul(1_000)).unwrap_or(Millis::MAX);
    now.saturating_add(span)
}

fn wall_clock() -> Millis {
    Utc::now().timestamp_millis()
}

fn ending_complete(sim: &Simulation) -> bool {
    sim.countdown().is_finished() && sim.timeline().is_idle()
}

fn render(face: &Face) -> String {
    match face {
        Face::Loading => face.summary().dimmed().to_string(),
        Face::Counting(counting) if counting.urgent => face.summary().red().bold().to_string(),
        Face::Counting(counting) if counting.shaking => face.summary().yellow().to_string(),
        Face::Counting(_) => face.summary().green().to_string(),
        Face::Ending(_) => face.summary().bright_green().bold().to_string(),
    }
}
