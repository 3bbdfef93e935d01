//! Bridges the engine to real browser timers and Web Audio.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use countdown_core::{ConfigError, Countdown, CountdownConfig, Effect, Face, Timer};
use yew::Callback;

use crate::audio::ChimePlayer;
use crate::dom;
use crate::timers::{Task, TimerBank};

pub type SharedHost = Rc<RefCell<ClockHost>>;

/// Everything one mounted clock owns. Dropping it cancels every timer and
/// closes the audio context.
pub struct ClockHost {
    engine: Countdown,
    timers: TimerBank,
    audio: ChimePlayer,
    on_face: Callback<Face>,
}

impl ClockHost {
    /// Build the engine, open audio and start ticking.
    ///
    /// # Errors
    ///
    /// Returns the configuration error when the engine cannot be built.
    pub fn mount(config: &CountdownConfig, on_face: Callback<Face>) -> Result<SharedHost, ConfigError> {
        let engine = Countdown::new(config, dom::local_offset())?;
        log::debug!(
            "countdown mounted: {} variant, target {}",
            config.variant.key(),
            engine.target().as_millis()
        );
        let host = Rc::new(RefCell::new(Self {
            engine,
            timers: TimerBank::new(),
            audio: ChimePlayer::acquire(),
            on_face,
        }));
        let effects = host.borrow_mut().engine.mount(dom::now_ms());
        Self::execute(&host, effects);
        Ok(host)
    }

    pub fn press_stop(host: &SharedHost) {
        let effects = {
            let mut this = host.borrow_mut();
            let effects = this.engine.press_stop(dom::now_ms());
            log::debug!(
                "stop pressed ({} so far), target now {}",
                this.engine.stop_presses(),
                this.engine.target().as_millis()
            );
            effects
        };
        Self::execute(host, effects);
    }

    fn fire(weak: &Weak<RefCell<Self>>, timer: Timer) {
        let Some(host) = weak.upgrade() else {
            return;
        };
        let effects = {
            let mut this = host.borrow_mut();
            let was_finished = this.engine.is_finished();
            let effects = this.engine.fire(timer, dom::now_ms());
            if !was_finished && this.engine.is_finished() {
                log::debug!("countdown reached zero");
            }
            effects
        };
        Self::execute(&host, effects);
    }

    fn execute(host: &SharedHost, effects: Vec<Effect>) {
        let weak = Rc::downgrade(host);
        let mut this = host.borrow_mut();
        for effect in effects {
            let outcome = match effect {
                Effect::StartTicker { period_ms } => {
                    this.timers
                        .every(Timer::Ticker, period_ms, task(&weak, Timer::Ticker))
                }
                Effect::StopTicker => {
                    this.timers.cancel(Timer::Ticker);
                    Ok(())
                }
                Effect::Schedule { timer, delay_ms } => {
                    this.timers.after(timer, delay_ms, task(&weak, timer))
                }
                Effect::Chime {
                    frequency_hz,
                    duration_ms,
                } => {
                    this.audio.chime(frequency_hz, duration_ms);
                    Ok(())
                }
            };
            if let Err(err) = outcome {
                let message = format!(
                    "Failed to schedule countdown timer: {}",
                    dom::js_error_message(&err)
                );
                log::error!("{message}");
                dom::console_error(&message);
            }
        }
        let face = this.engine.face();
        let on_face = this.on_face.clone();
        drop(this);
        on_face.emit(face);
    }
}

impl Drop for ClockHost {
    fn drop(&mut self) {
        self.timers.clear();
        log::debug!("countdown unmounted");
    }
}

fn task(weak: &Weak<RefCell<ClockHost>>, timer: Timer) -> Task {
    let weak = weak.clone();
    Rc::new(move || ClockHost::fire(&weak, timer))
}
