//! Startup readiness configuration.

use std::time::Duration;

use serde::Deserialize;

/// Bounded wait-and-retry used while dependencies come up.
#[derive(Debug, Clone, Deserialize)]
pub struct StartupConfig {
    /// Readiness probes before giving up (default: 10).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed delay between probes (default: 500ms).
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

const fn default_max_attempts() -> u32 {
    10
}

const fn default_retry_delay_ms() -> u64 {
    500
}

impl StartupConfig {
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}
