//! Canonical test configurations.
//!
//! Single source of truth for settings used across tests.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;

use crate::application::betting::BettingSettings;
use crate::application::lifecycle::LifecycleSettings;
use crate::application::matchmaking::MatchmakingSettings;
use crate::application::pacing::PacingSettings;

/// Deterministic generator for reproducible tests.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Lifecycle settings with no thinking pauses.
pub fn lifecycle(move_ceiling: usize) -> LifecycleSettings {
    LifecycleSettings {
        move_ceiling,
        platform_fee: Decimal::new(5, 2),
        pacing: PacingSettings::INSTANT,
    }
}

/// Matchmaking settings with the given inventory targets.
pub fn matchmaking(min_active: usize, min_upcoming: usize) -> MatchmakingSettings {
    MatchmakingSettings {
        min_active,
        min_upcoming,
        ..MatchmakingSettings::default()
    }
}

/// Default stake limits and 5% fee.
pub fn betting() -> BettingSettings {
    BettingSettings::default()
}
