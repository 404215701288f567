//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application
//! settings. Configuration is loaded from a TOML file; a few endpoints can
//! be overridden from the environment (or a `.env` file loaded at startup):
//!
//! - `MODELFLEET_API_URL` - `[source] api_url`
//! - `MODELFLEET_WS_URL` - `[status_stream] ws_url`
//! - `MODELFLEET_ORDER_PATH` - `[storage] order_path`
//!
//! # Example
//!
//! ```no_run
//! use modelfleet::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::logging::{LoggingConfig, LOG_FORMATS};
use super::paths;
use super::refresh::RefreshConfig;
use super::storage::StorageConfig;
use crate::adapter::outbound::http::SourceConfig;
use crate::adapter::outbound::stream::StatusStreamConfig;
use crate::error::{ConfigError, Result};

pub const ENV_API_URL: &str = "MODELFLEET_API_URL";
pub const ENV_WS_URL: &str = "MODELFLEET_WS_URL";
pub const ENV_ORDER_PATH: &str = "MODELFLEET_ORDER_PATH";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub status_stream: StatusStreamConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse and validate a TOML document. Environment is not consulted.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config = Self::from_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`, apply environment overrides, then validate.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given. Otherwise load the default config file if it
    /// exists, falling back to built-in defaults.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = paths::default_config();
        if default_path.is_file() {
            return Self::load(default_path);
        }

        debug!(path = %default_path.display(), "No config file, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override endpoints from `lookup` (normally the process environment).
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(api_url) = lookup(ENV_API_URL) {
            self.source.api_url = api_url;
        }
        if let Some(ws_url) = lookup(ENV_WS_URL) {
            self.status_stream.ws_url = ws_url;
        }
        if let Some(order_path) = lookup(ENV_ORDER_PATH) {
            self.storage.order_path = PathBuf::from(order_path);
        }
    }

    /// Render the effective configuration as TOML.
    #[allow(clippy::result_large_err)]
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self).map_err(ConfigError::Serialize)?)
    }

    pub fn init_logging(&self) {
        self.logging.init();
    }

    #[allow(clippy::result_large_err)]
    fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(ConfigError::Parse)?)
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.source.api_url, &["http", "https"])?;
        if self.source.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry_max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.source.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.status_stream.enabled {
            validate_url("ws_url", &self.status_stream.ws_url, &["ws", "wss"])?;
        }
        let reconnection = &self.status_stream.reconnection;
        if reconnection.initial_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "initial_delay_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if reconnection.max_delay_ms < reconnection.initial_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_delay_ms",
                reason: "must be >= initial_delay_ms".to_string(),
            }
            .into());
        }
        if reconnection.backoff_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier",
                reason: "must be >= 1.0".to_string(),
            }
            .into());
        }

        if self.refresh.disconnected_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "disconnected_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.refresh.connected_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connected_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.storage.order_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "order_path",
            }
            .into());
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }

        Ok(())
    }
}

#[allow(clippy::result_large_err)]
fn validate_url(field: &'static str, raw: &str, schemes: &[&str]) -> Result<()> {
    if raw.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    let url = Url::parse(raw).map_err(|err| ConfigError::InvalidValue {
        field,
        reason: err.to_string(),
    })?;
    if !schemes.contains(&url.scheme()) {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("scheme must be one of {}", schemes.join(", ")),
        }
        .into());
    }
    Ok(())
}
