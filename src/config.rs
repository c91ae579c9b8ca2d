//! Centralized configuration management.
//!
//! Runtime tunables come from environment variables with sensible
//! defaults. The fleet itself is declarative: a JSON file listing every
//! RIC this instance supervises, loaded once at startup.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::supervision::SupervisionConfig;

/// Default values for configuration
mod defaults {
    use std::path::PathBuf;

    pub fn request_timeout_secs() -> u64 { 10 }
    pub fn fleet_file() -> PathBuf { "./rics.json".into() }
}

/// A1 transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct A1Config {
    /// End-to-end timeout for one A1 request (seconds)
    #[serde(default = "defaults::request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl A1Config {
    /// Load A1 configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let request_timeout_secs =
            parse_env_u64("A1_REQUEST_TIMEOUT_SECS", defaults::request_timeout_secs())?;

        if !(1..=300).contains(&request_timeout_secs) {
            return Err(ConfigError::InvalidValue {
                key: "A1_REQUEST_TIMEOUT_SECS".to_string(),
                value: request_timeout_secs.to_string(),
                reason: "must be between 1 and 300".to_string(),
            });
        }

        Ok(Self { request_timeout_secs })
    }
}

impl Default for A1Config {
    fn default() -> Self {
        Self { request_timeout_secs: defaults::request_timeout_secs() }
    }
}

/// Fleet file location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Path to the JSON file describing the supervised RICs
    #[serde(default = "defaults::fleet_file")]
    pub fleet_file: PathBuf,
}

impl FleetConfig {
    /// Load fleet configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let fleet_file = std::env::var("RIC_FLEET_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| defaults::fleet_file());
        Ok(Self { fleet_file })
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self { fleet_file: defaults::fleet_file() }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub supervision: SupervisionConfig,
    pub a1: A1Config,
    pub fleet: FleetConfig,
}

impl AppConfig {
    /// Load complete configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            supervision: load_supervision()?,
            a1: A1Config::load()?,
            fleet: FleetConfig::load()?,
        })
    }
}

fn load_supervision() -> Result<SupervisionConfig, ConfigError> {
    let base = SupervisionConfig::default();
    let config = SupervisionConfig {
        interval_secs: parse_env_u64("SUPERVISION_INTERVAL_SECS", base.interval_secs)?,
        check_timeout_secs: parse_env_u64(
            "SUPERVISION_CHECK_TIMEOUT_SECS",
            base.check_timeout_secs,
        )?,
    };
    if let Err(reason) = config.validate() {
        // blame the variable holding the offending value; the interval
        // range is checked first in validate(), so an in-range interval
        // means the timeout check failed
        let (key, value) = if !(1..=3600).contains(&config.interval_secs) {
            ("SUPERVISION_INTERVAL_SECS", config.interval_secs)
        } else {
            ("SUPERVISION_CHECK_TIMEOUT_SECS", config.check_timeout_secs)
        };
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        });
    }
    Ok(config)
}

fn parse_env_u64(key: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(value) => Ok(value),
            Err(e) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
                reason: format!("must be an unsigned integer: {e}"),
            }),
        },
        Err(_) => Ok(default),
    }
}

/// One RIC as declared in the fleet file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RicConfig {
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub managed_element_ids: Vec<String>,
}

/// Read and parse the fleet file.
pub fn load_fleet(path: &Path) -> Result<Vec<RicConfig>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FleetFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let rics: Vec<RicConfig> = serde_json::from_str(&raw).map_err(|e| ConfigError::FleetFile {
        path: path.to_path_buf(),
        reason: format!("invalid JSON: {e}"),
    })?;

    // duplicate names would silently collapse into one registry entry
    let mut seen = HashSet::new();
    for ric in &rics {
        if !seen.insert(ric.name.as_str()) {
            return Err(ConfigError::FleetFile {
                path: path.to_path_buf(),
                reason: format!("duplicate ric name '{}'", ric.name),
            });
        }
    }
    Ok(rics)
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { key: String, value: String, reason: String },
    FleetFile { path: PathBuf, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value, reason } => {
                write!(f, "Invalid configuration for {}: '{}' ({})", key, value, reason)
            }
            ConfigError::FleetFile { path, reason } => {
                write!(f, "Fleet file {} unusable: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
