//! Matchmaking generator configuration.

use serde::Deserialize;

use crate::application::matchmaking::MatchmakingSettings;

/// Matchmaking configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchmakingConfig {
    /// Seconds between matchmaking runs (default: 300).
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
    /// Minimum number of live matches.
    #[serde(default = "default_min_active")]
    pub min_active: usize,
    /// Minimum number of scheduled matches.
    #[serde(default = "default_min_upcoming")]
    pub min_upcoming: usize,
    #[serde(default = "default_balanced_probability")]
    pub balanced_probability: f64,
    #[serde(default = "default_max_balanced_gap")]
    pub max_balanced_gap: u32,
    #[serde(default = "default_mismatch_min_gap")]
    pub mismatch_min_gap: u32,
    #[serde(default = "default_mismatch_max_gap")]
    pub mismatch_max_gap: u32,
    #[serde(default = "default_schedule_min_minutes")]
    pub schedule_min_minutes: i64,
    #[serde(default = "default_schedule_max_minutes")]
    pub schedule_max_minutes: i64,
}

const fn default_tick_interval_secs() -> u64 {
    300
}

const fn default_min_active() -> usize {
    2
}

const fn default_min_upcoming() -> usize {
    5
}

const fn default_balanced_probability() -> f64 {
    0.7
}

const fn default_max_balanced_gap() -> u32 {
    200
}

const fn default_mismatch_min_gap() -> u32 {
    200
}

const fn default_mismatch_max_gap() -> u32 {
    500
}

const fn default_schedule_min_minutes() -> i64 {
    15
}

const fn default_schedule_max_minutes() -> i64 {
    24 * 60
}

impl Default for MatchmakingConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
            min_active: default_min_active(),
            min_upcoming: default_min_upcoming(),
            balanced_probability: default_balanced_probability(),
            max_balanced_gap: default_max_balanced_gap(),
            mismatch_min_gap: default_mismatch_min_gap(),
            mismatch_max_gap: default_mismatch_max_gap(),
            schedule_min_minutes: default_schedule_min_minutes(),
            schedule_max_minutes: default_schedule_max_minutes(),
        }
    }
}

impl From<&MatchmakingConfig> for MatchmakingSettings {
    fn from(config: &MatchmakingConfig) -> Self {
        Self {
            min_active: config.min_active,
            min_upcoming: config.min_upcoming,
            balanced_probability: config.balanced_probability,
            max_balanced_gap: config.max_balanced_gap,
            mismatch_min_gap: config.mismatch_min_gap,
            mismatch_max_gap: config.mismatch_max_gap,
            schedule_min_minutes: config.schedule_min_minutes,
            schedule_max_minutes: config.schedule_max_minutes,
        }
    }
}
