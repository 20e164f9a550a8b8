//! Betting configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::betting::BettingSettings;

/// Betting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BettingConfig {
    /// Fraction of each pool kept by the platform (default: 0.05).
    #[serde(default = "default_platform_fee")]
    pub platform_fee: Decimal,
    /// Smallest accepted stake.
    #[serde(default = "default_min_stake")]
    pub min_stake: Decimal,
    /// Largest accepted stake; unlimited when absent.
    #[serde(default)]
    pub max_stake: Option<Decimal>,
}

fn default_platform_fee() -> Decimal {
    Decimal::new(5, 2) // 5%
}

fn default_min_stake() -> Decimal {
    Decimal::new(1, 2)
}

impl Default for BettingConfig {
    fn default() -> Self {
        Self {
            platform_fee: default_platform_fee(),
            min_stake: default_min_stake(),
            max_stake: None,
        }
    }
}

impl From<&BettingConfig> for BettingSettings {
    fn from(config: &BettingConfig) -> Self {
        Self {
            platform_fee: config.platform_fee,
            min_stake: config.min_stake,
            max_stake: config.max_stake,
        }
    }
}
