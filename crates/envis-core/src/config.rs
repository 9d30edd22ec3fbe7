//! Configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the config dir
//!    (~/.config/envis/config.toml) if it exists
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::fairness::{DEFAULT_HOURLY_VALUE, DEFAULT_WEEKS_PER_YEAR};
use crate::insights::ProjectionRates;
use crate::timeline::TimelineFilter;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/envis.toml");

/// Fairness calculator settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FairnessSettings {
    pub weeks_per_year: f64,
    pub default_hourly_value: f64,
}

impl Default for FairnessSettings {
    fn default() -> Self {
        Self {
            weeks_per_year: DEFAULT_WEEKS_PER_YEAR,
            default_hourly_value: DEFAULT_HOURLY_VALUE,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            allowed_origins: Vec::new(),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvisConfig {
    pub default_timeline: TimelineFilter,
    pub projection: ProjectionRates,
    pub fairness: FairnessSettings,
    pub server: ServerSettings,
}

impl EnvisConfig {
    /// Load configuration (explicit path, then override location, then defaults)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(default_path) => {
                    tracing::debug!(path = %default_path.display(), "Using config override");
                    fs::read_to_string(&default_path)
                        .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
                }
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("envis").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    defaults: Option<RawDefaults>,
    projection: Option<RawProjection>,
    fairness: Option<RawFairness>,
    server: Option<RawServer>,
}

#[derive(Debug, Deserialize)]
struct RawDefaults {
    timeline: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawProjection {
    index_fund_rate: Option<f64>,
    savings_account_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawFairness {
    weeks_per_year: Option<f64>,
    default_hourly_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<EnvisConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = EnvisConfig::default();

    if let Some(defaults) = raw.defaults {
        if let Some(timeline) = defaults.timeline {
            config.default_timeline = timeline.parse().map_err(Error::Config)?;
        }
    }

    if let Some(projection) = raw.projection {
        if let Some(rate) = projection.index_fund_rate {
            config.projection.index_fund_rate = rate;
        }
        if let Some(rate) = projection.savings_account_rate {
            config.projection.savings_account_rate = rate;
        }
    }

    if let Some(fairness) = raw.fairness {
        if let Some(weeks) = fairness.weeks_per_year {
            if weeks <= 0.0 {
                return Err(Error::Config("weeks_per_year must be positive".into()));
            }
            config.fairness.weeks_per_year = weeks;
        }
        if let Some(value) = fairness.default_hourly_value {
            config.fairness.default_hourly_value = value;
        }
    }

    if let Some(server) = raw.server {
        if let Some(host) = server.host {
            config.server.host = host;
        }
        if let Some(port) = server.port {
            config.server.port = port;
        }
        if let Some(origins) = server.allowed_origins {
            config.server.allowed_origins = origins;
        }
    }

    Ok(config)
}
