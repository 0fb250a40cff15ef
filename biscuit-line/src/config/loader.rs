//! Configuration loader
//!
//! Parses a TOML document into a validated `LineConfig`. Keys left out of
//! the document take their defaults.

use biscuit_core::config::{ConfigError, LineConfig};
use log::{debug, info, warn};

/// Embedded default configuration
/// Edit line.toml and rebuild to customize
pub const EMBEDDED_CONFIG: &str = include_str!("../../line.toml");

/// Configuration loading errors
#[derive(Debug, Clone)]
pub enum LoadError {
    /// Document is not valid TOML or has mistyped values
    Toml(toml::de::Error),
    /// Values parsed but the line cannot run with them
    Invalid(ConfigError),
}

impl core::fmt::Display for LoadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LoadError::Toml(e) => write!(f, "TOML parse error: {}", e.message()),
            LoadError::Invalid(e) => write!(f, "invalid line configuration: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Toml(e) => Some(e),
            LoadError::Invalid(_) => None,
        }
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Invalid(e)
    }
}

/// Load the line configuration
///
/// Uses the embedded line.toml when no document is supplied.
pub fn load(source: Option<&str>) -> Result<LineConfig, LoadError> {
    match source {
        Some(text) => {
            info!("Loading line configuration");
            parse_config(text)
        }
        None => {
            info!("No line configuration supplied, using embedded defaults");
            parse_config(EMBEDDED_CONFIG)
        }
    }
}

/// Parse and validate a TOML document
pub fn parse_config(text: &str) -> Result<LineConfig, LoadError> {
    let config: LineConfig = toml::from_str(text).map_err(|e: toml::de::Error| {
        warn!("TOML parse error: {}", e.message());
        LoadError::Toml(e)
    })?;

    config.validate().map_err(|e| {
        warn!("Line configuration rejected: {}", e);
        LoadError::from(e)
    })?;

    log_config_summary(&config);
    Ok(config)
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &LineConfig) {
    info!("Configuration loaded successfully");
    debug!(
        "  pulse {} ms, settle {} ms",
        config.pulse_interval_ms,
        config.settle_interval_ms
    );
    debug!("  stamper at slot {}", config.stamper_slot);
    debug!(
        "  payload {}, mark {}",
        config.raw_payload.as_str(),
        config.stamp_mark.as_str()
    );
}
