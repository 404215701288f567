//! Status stream settings.

use serde::{Deserialize, Serialize};

/// `[status_stream]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusStreamConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// WebSocket URL of the push channel.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    #[serde(default)]
    pub reconnection: ReconnectionConfig,
}

fn default_enabled() -> bool {
    true
}

fn default_ws_url() -> String {
    "ws://127.0.0.1:8080/api/ws".into()
}

impl Default for StatusStreamConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ws_url: default_ws_url(),
            reconnection: ReconnectionConfig::default(),
        }
    }
}

/// Backoff between reconnection attempts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconnectionConfig {
    /// Delay before the first reconnection attempt (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Upper bound on the delay (milliseconds).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Multiplier applied to the delay after each failed attempt.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_initial_delay_ms() -> u64 {
    1000 // 1 second
}

fn default_max_delay_ms() -> u64 {
    30000 // 30 seconds
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for ReconnectionConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}
