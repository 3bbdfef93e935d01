//! Countdown configuration bundled with the page.

use countdown_core::{ConfigError, CountdownConfig, utc_offset};

/// The JSON shipped in `static/assets/data/countdown.json`.
pub const EMBEDDED_CONFIG: &str = include_str!("../static/assets/data/countdown.json");

#[derive(Debug, thiserror::Error)]
pub enum WebConfigError {
    #[error("Invalid countdown configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Load the embedded configuration.
///
/// # Errors
///
/// Returns an error when the bundled JSON is malformed or names an unusable target.
pub fn load_config() -> Result<CountdownConfig, WebConfigError> {
    parse_config(EMBEDDED_CONFIG)
}

/// Parse and fully validate a configuration document.
///
/// The target is resolved against UTC here only to prove it parses; the clock
/// resolves it again against the browser's own offset when it mounts.
///
/// # Errors
///
/// Returns an error when the JSON is malformed or any invariant fails.
pub fn parse_config(json: &str) -> Result<CountdownConfig, WebConfigError> {
    let cfg = CountdownConfig::from_json(json)?;
    cfg.target_instant(utc_offset())?;
    Ok(cfg)
}
