use anyhow::{Context, Result};
use countdown_core::CountdownConfig;
use std::fs;
use std::path::Path;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Read a configuration file, or fall back to the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<CountdownConfig> {
    let Some(path) = path else {
        return Ok(CountdownConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    CountdownConfig::from_json(&json)
        .with_context(|| format!("invalid countdown config in {}", path.display()))
}
