//! YAML configuration loading.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use venture_core::{
    theme_for_date, theme_for_week, validate_config, ThemeId, ValidationError, VentureConfig,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid config: {0}")]
    Parse(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Parse and validate a YAML document. Missing keys take their defaults.
pub fn parse_config(text: &str) -> Result<VentureConfig, ConfigError> {
    let config = if text.trim().is_empty() {
        VentureConfig::default()
    } else {
        serde_yaml::from_str(text)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Read a YAML config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<VentureConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    info!(path = %path.display(), seed = config.rng_seed, "config loaded");
    Ok(config)
}

/// Theme for a session: the pinned week if configured, else the calendar week of `today`.
pub fn select_theme(config: &VentureConfig, today: NaiveDate) -> ThemeId {
    match config.theme_week {
        Some(week) => theme_for_week(week),
        None => theme_for_date(today),
    }
}
