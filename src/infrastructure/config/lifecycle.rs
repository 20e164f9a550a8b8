//! Lifecycle scheduler configuration.

use serde::Deserialize;

use crate::application::pacing::PacingSettings;

/// Thinking-time pause configuration, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_base_ms")]
    pub base_ms: u64,
    #[serde(default = "default_complex_ms")]
    pub complex_ms: u64,
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
    /// Legal-move count at which a position counts as complex.
    #[serde(default = "default_complex_move_threshold")]
    pub complex_move_threshold: usize,
}

const fn default_base_ms() -> u64 {
    1500
}

const fn default_complex_ms() -> u64 {
    3500
}

const fn default_jitter_ms() -> u64 {
    2000
}

const fn default_complex_move_threshold() -> usize {
    30
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base_ms: default_base_ms(),
            complex_ms: default_complex_ms(),
            jitter_ms: default_jitter_ms(),
            complex_move_threshold: default_complex_move_threshold(),
        }
    }
}

impl From<&PacingConfig> for PacingSettings {
    fn from(config: &PacingConfig) -> Self {
        Self {
            base_ms: config.base_ms,
            complex_ms: config.complex_ms,
            jitter_ms: config.jitter_ms,
            complex_move_threshold: config.complex_move_threshold,
        }
    }
}

/// Lifecycle manager configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleConfig {
    /// Seconds between lifecycle ticks (default: 30).
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
    /// Plies after which a match is forced to a draw (default: 100).
    #[serde(default = "default_move_ceiling")]
    pub move_ceiling: usize,
    #[serde(default)]
    pub pacing: PacingConfig,
}

const fn default_tick_interval_secs() -> u64 {
    30
}

const fn default_move_ceiling() -> usize {
    100
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
            move_ceiling: default_move_ceiling(),
            pacing: PacingConfig::default(),
        }
    }
}
