//! Canonical test configurations.

use std::time::Duration;

use crate::adapter::outbound::stream::ReconnectionConfig;
use crate::application::RefreshPolicy;

/// Fast reconnection config; no meaningful waiting in tests.
pub fn reconnection() -> ReconnectionConfig {
    ReconnectionConfig {
        initial_delay_ms: 1,
        max_delay_ms: 5,
        backoff_multiplier: 1.0,
    }
}

/// 5 s disconnected, 30 s connected.
pub fn refresh_policy() -> RefreshPolicy {
    RefreshPolicy::new(Duration::from_secs(5), Duration::from_secs(30))
}

/// Minimal valid config file body pointing at `api_url`.
pub fn config_toml(api_url: &str, order_path: &str) -> String {
    format!(
        r#"
[source]
api_url = "{api_url}"

[status_stream]
enabled = false

[storage]
order_path = "{order_path}"
"#
    )
}
