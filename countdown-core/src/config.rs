//! Countdown configuration.
//!
//! Every field has a default, so an empty JSON object yields the stock widget.
//! The stock Stop penalty pulls the target closer and shortens the countdown;
//! set `taunt.penalty` to `"postpone"` for a Stop that only ever adds time.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BASIC_TICK_MS, DEFAULT_CHIME_GAP_MS, DEFAULT_CHIME_HZ, DEFAULT_CHIME_MS, DEFAULT_ENDING_FIRST,
    DEFAULT_ENDING_SECOND, DEFAULT_FIRST_HIDE_MS, DEFAULT_GREETING, DEFAULT_SECOND_HIDE_MS,
    DEFAULT_SECOND_SHOW_MS, DEFAULT_TARGET, DEFAULT_TAUNT, DEFAULT_TAUNT_MS, EXTENDED_TICK_MS,
    MAX_CHIME_HZ, MIN_CHIME_HZ,
};
use crate::ending::{Cue, EndingPhase, Script};
use crate::instant::TargetInstant;

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target `{input}` is not a recognizable date")]
    InvalidTarget { input: String },
    #[error(
        "ending cues must be strictly increasing (got {first_hide} / {second_show} / {second_hide} ms)"
    )]
    UnorderedEnding {
        first_hide: u32,
        second_show: u32,
        second_hide: u32,
    },
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
    #[error("chime frequency {hz} Hz is outside the audible 20..=20000 Hz range")]
    InvalidTone { hz: f32 },
    #[error("configuration JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which flavour of the widget to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// One-second ticks; freezes at zero when done.
    Basic,
    /// Hundredth-second ticks, last-day emphasis and the ending sequence.
    #[default]
    Extended,
}

impl Variant {
    #[must_use]
    pub const fn tick_ms(self) -> u32 {
        match self {
            Self::Basic => BASIC_TICK_MS,
            Self::Extended => EXTENDED_TICK_MS,
        }
    }

    #[must_use]
    pub const fn has_last_day(self) -> bool {
        matches!(self, Self::Extended)
    }

    #[must_use]
    pub const fn has_ending(self) -> bool {
        matches!(self, Self::Extended)
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Extended => "extended",
        }
    }
}

/// Which way the Stop button moves the target.
///
/// [`StopPenalty::Advance`] shortens the remaining time by a day;
/// [`StopPenalty::Postpone`] lengthens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopPenalty {
    /// Pull the target one day closer.
    #[default]
    Advance,
    /// Push the target one day further out.
    Postpone,
}

impl StopPenalty {
    #[must_use]
    pub const fn day_shift(self) -> i64 {
        match self {
            Self::Advance => -1,
            Self::Postpone => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TauntConfig {
    #[serde(default = "TauntConfig::default_message")]
    pub message: String,
    #[serde(default = "TauntConfig::default_duration_ms")]
    pub duration_ms: u32,
    #[serde(default)]
    pub penalty: StopPenalty,
}

impl TauntConfig {
    fn default_message() -> String {
        DEFAULT_TAUNT.to_string()
    }

    const fn default_duration_ms() -> u32 {
        DEFAULT_TAUNT_MS
    }
}

impl Default for TauntConfig {
    fn default() -> Self {
        Self {
            message: Self::default_message(),
            duration_ms: Self::default_duration_ms(),
            penalty: StopPenalty::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChimeConfig {
    #[serde(default = "ChimeConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "ChimeConfig::default_frequency_hz")]
    pub frequency_hz: f32,
    #[serde(default = "ChimeConfig::default_duration_ms")]
    pub duration_ms: u32,
    #[serde(default = "ChimeConfig::default_min_gap_ms")]
    pub min_gap_ms: u32,
}

impl ChimeConfig {
    const fn default_enabled() -> bool {
        true
    }

    const fn default_frequency_hz() -> f32 {
        DEFAULT_CHIME_HZ
    }

    const fn default_duration_ms() -> u32 {
        DEFAULT_CHIME_MS
    }

    const fn default_min_gap_ms() -> u32 {
        DEFAULT_CHIME_GAP_MS
    }
}

impl Default for ChimeConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            frequency_hz: Self::default_frequency_hz(),
            duration_ms: Self::default_duration_ms(),
            min_gap_ms: Self::default_min_gap_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndingConfig {
    #[serde(default = "EndingConfig::default_first_text")]
    pub first_text: String,
    #[serde(default = "EndingConfig::default_second_text")]
    pub second_text: String,
    #[serde(default = "EndingConfig::default_first_hide_ms")]
    pub first_hide_ms: u32,
    #[serde(default = "EndingConfig::default_second_show_ms")]
    pub second_show_ms: u32,
    #[serde(default = "EndingConfig::default_second_hide_ms")]
    pub second_hide_ms: u32,
}

impl EndingConfig {
    fn default_first_text() -> String {
        DEFAULT_ENDING_FIRST.to_string()
    }

    fn default_second_text() -> String {
        DEFAULT_ENDING_SECOND.to_string()
    }

    const fn default_first_hide_ms() -> u32 {
        DEFAULT_FIRST_HIDE_MS
    }

    const fn default_second_show_ms() -> u32 {
        DEFAULT_SECOND_SHOW_MS
    }

    const fn default_second_hide_ms() -> u32 {
        DEFAULT_SECOND_HIDE_MS
    }

    /// The phase script: first line shown immediately, then the configured offsets.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnorderedEnding`] unless the offsets strictly increase.
    pub fn script(&self) -> Result<Script<EndingPhase>, ConfigError> {
        Script::new(vec![
            Cue::new(0, EndingPhase::FirstShown),
            Cue::new(self.first_hide_ms, EndingPhase::FirstHidden),
            Cue::new(self.second_show_ms, EndingPhase::SecondShown),
            Cue::new(self.second_hide_ms, EndingPhase::SecondHidden),
        ])
        .ok_or(ConfigError::UnorderedEnding {
            first_hide: self.first_hide_ms,
            second_show: self.second_show_ms,
            second_hide: self.second_hide_ms,
        })
    }
}

impl Default for EndingConfig {
    fn default() -> Self {
        Self {
            first_text: Self::default_first_text(),
            second_text: Self::default_second_text(),
            first_hide_ms: Self::default_first_hide_ms(),
            second_show_ms: Self::default_second_show_ms(),
            second_hide_ms: Self::default_second_hide_ms(),
        }
    }
}

/// Top-level widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownConfig {
    #[serde(default = "CountdownConfig::default_target")]
    pub target: String,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default = "CountdownConfig::default_greeting")]
    pub greeting: String,
    #[serde(default)]
    pub taunt: TauntConfig,
    #[serde(default)]
    pub chime: ChimeConfig,
    #[serde(default)]
    pub ending: EndingConfig,
}

impl CountdownConfig {
    fn default_target() -> String {
        DEFAULT_TARGET.to_string()
    }

    fn default_greeting() -> String {
        DEFAULT_GREETING.to_string()
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input, or whichever invariant
    /// [`CountdownConfig::validate`] rejects.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the invariants the engine relies on. The target itself is checked
    /// by [`CountdownConfig::target_instant`] since it needs the local offset.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.taunt.duration_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "taunt.durationMs",
            });
        }
        if self.chime.duration_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "chime.durationMs",
            });
        }
        let hz = self.chime.frequency_hz;
        if !hz.is_finite() || !(MIN_CHIME_HZ..=MAX_CHIME_HZ).contains(&hz) {
            return Err(ConfigError::InvalidTone { hz });
        }
        self.ending.script()?;
        Ok(())
    }

    /// Resolve the configured target at the given local offset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTarget`] if the target text does not parse.
    pub fn target_instant(&self, local_offset: FixedOffset) -> Result<TargetInstant, ConfigError> {
        TargetInstant::parse(&self.target, local_offset)
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            target: Self::default_target(),
            variant: Variant::default(),
            greeting: Self::default_greeting(),
            taunt: TauntConfig::default(),
            chime: ChimeConfig::default(),
            ending: EndingConfig::default(),
        }
    }
}
