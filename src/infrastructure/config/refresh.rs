//! Refresh cadence settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::RefreshPolicy;

/// `[refresh]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Poll period while the status stream is down.
    #[serde(default = "default_disconnected_interval_secs")]
    pub disconnected_interval_secs: u64,
    /// Poll period while the status stream is up.
    #[serde(default = "default_connected_interval_secs")]
    pub connected_interval_secs: u64,
}

const fn default_disconnected_interval_secs() -> u64 {
    5
}

const fn default_connected_interval_secs() -> u64 {
    30
}

impl RefreshConfig {
    #[must_use]
    pub const fn policy(&self) -> RefreshPolicy {
        RefreshPolicy::new(
            Duration::from_secs(self.disconnected_interval_secs),
            Duration::from_secs(self.connected_interval_secs),
        )
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            disconnected_interval_secs: default_disconnected_interval_secs(),
            connected_interval_secs: default_connected_interval_secs(),
        }
    }
}
