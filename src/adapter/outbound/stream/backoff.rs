//! Exponential reconnection backoff with jitter.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::settings::ReconnectionConfig;

#[derive(Debug, Clone)]
pub(crate) struct Backoff {
    config: ReconnectionConfig,
    current_delay_ms: u64,
    attempts: u32,
}

impl Backoff {
    pub(crate) fn new(config: ReconnectionConfig) -> Self {
        Self {
            current_delay_ms: config.initial_delay_ms,
            config,
            attempts: 0,
        }
    }

    /// Back to the initial delay after a successful connection.
    pub(crate) fn reset(&mut self) {
        self.attempts = 0;
        self.current_delay_ms = self.config.initial_delay_ms;
    }

    pub(crate) const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Current delay plus jitter; advances the delay for the next call.
    pub(crate) fn next_delay(&mut self) -> Duration {
        let base = Duration::from_millis(self.current_delay_ms);
        let delay = base + Duration::from_millis(jitter_ms(base));

        let next = (self.current_delay_ms as f64 * self.config.backoff_multiplier) as u64;
        self.current_delay_ms = next
            .min(self.config.max_delay_ms)
            .max(self.config.initial_delay_ms);
        self.attempts += 1;

        delay
    }
}

/// Up to 20% of `base`.
fn jitter_ms(base: Duration) -> u64 {
    let range = u64::try_from(base.as_millis()).unwrap_or(u64::MAX) / 5;
    if range == 0 {
        return 0;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    u64::from(nanos) % (range + 1)
}
