//! Logging configuration and initialization.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// `pretty`, `json` or `compact`.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".into()
}

fn default_format() -> String {
    "pretty".into()
}

/// Formats [`LoggingConfig::init`] understands.
pub const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// `RUST_LOG` takes precedence over the configured level. Logs go to
    /// stderr so command output on stdout stays machine-readable.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));
        let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

        match self.format.as_str() {
            "json" => builder.json().init(),
            "compact" => builder.compact().init(),
            _ => builder.init(),
        }
    }

    /// Copy with the level replaced, e.g. from a `--verbose` flag.
    #[must_use]
    pub fn with_level(&self, level: &str) -> Self {
        Self {
            level: level.to_string(),
            format: self.format.clone(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}
