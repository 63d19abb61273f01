//! Configuration for the pac-serve library.
//!
//! This module handles loading, parsing and validating the YAML
//! configuration file. Every section has defaults, so an empty file (or no
//! file at all, via [`AppConfig::default`]) is a working configuration.

use crate::error::{PacError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// PAC rendering configuration section.
///
/// `address` and `port` are overrides for the endpoint advertised in the
/// generated script; the empty string and 0 disable them, in which case the
/// endpoint is derived from each request's host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PacConfig {
    /// Proxy address to advertise; empty = derive from request host.
    pub address: String,

    /// Proxy port to advertise; 0 = derive from request host.
    pub port: u16,

    /// Domain suffix that triggers proxying.
    pub tld: String,

    /// Custom template body; None = built-in default script.
    pub template: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable pretty format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for structured logging.
    Json,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    pub level: String,

    /// Output destination: stdout, stderr, or file path.
    pub output: String,

    /// Log format.
    pub format: LogFormat,

    /// Include target (module path) in logs.
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: "stdout".to_string(),
            format: LogFormat::Pretty,
            include_target: true,
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    /// PAC rendering configuration.
    pub pac: PacConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PacError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = fs::read_to_string(path)?;
        let config: AppConfig =
            serde_yaml::from_str(&contents).map_err(|e| PacError::config_parse(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// The `pac` section is accepted as-is: empty address/tld and port 0
    /// are meaningful "derive from request" values, and custom templates
    /// are not placeholder-checked here: a bad placeholder surfaces as a
    /// truncated render, not a load failure.
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(PacError::config_validation(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}
