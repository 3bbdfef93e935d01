//! The audible tick.
//!
//! One `AudioContext` per mounted clock, closed on drop. Browsers without Web
//! Audio get a silent player.

use countdown_core::numbers::millis_to_secs;
use web_sys::{AudioContext, OscillatorType};

#[derive(Default)]
pub struct ChimePlayer {
    context: Option<AudioContext>,
}

impl ChimePlayer {
    /// Open an audio context, or fall back to silence when the platform has none.
    #[must_use]
    pub fn acquire() -> Self {
        Self {
            context: AudioContext::new().ok(),
        }
    }

    #[must_use]
    pub const fn silent() -> Self {
        Self { context: None }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.context.is_some()
    }

    /// Play a short sine tone. Any Web Audio failure just means no sound.
    pub fn chime(&self, frequency_hz: f32, duration_ms: u32) {
        let Some(ctx) = self.context.as_ref() else {
            return;
        };
        let Ok(osc) = ctx.create_oscillator() else {
            return;
        };
        let now = ctx.current_time();
        osc.set_type(OscillatorType::Sine);
        let _ = osc.frequency().set_value_at_time(frequency_hz, now);
        if osc.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }
        let _ = osc.start();
        let _ = osc.stop_with_when(now + millis_to_secs(duration_ms));
    }
}

impl Drop for ChimePlayer {
    fn drop(&mut self) {
        if let Some(ctx) = self.context.take() {
            let _ = ctx.close();
        }
    }
}
