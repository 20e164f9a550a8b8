//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all arena settings.
//! Configuration is loaded from a TOML file, then `KNIGHTWATCH_*`
//! environment variables override the operational knobs, then everything is
//! validated.
//!
//! # Example
//!
//! ```no_run
//! use knightwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::betting::BettingConfig;
use super::lifecycle::LifecycleConfig;
use super::logging::LoggingConfig;
use super::matchmaking::MatchmakingConfig;
use super::startup::StartupConfig;
use crate::application::betting::BettingSettings;
use crate::application::lifecycle::LifecycleSettings;
use crate::application::matchmaking::{MatchmakingSettings, MAX_SCHEDULE_MINUTES};
use crate::domain::personality::{Personality, PersonalityRegistry};
use crate::error::{ConfigError, Result};

pub const ENV_MIN_ACTIVE: &str = "KNIGHTWATCH_MIN_ACTIVE_MATCHES";
pub const ENV_MIN_UPCOMING: &str = "KNIGHTWATCH_MIN_UPCOMING_MATCHES";
pub const ENV_LIFECYCLE_INTERVAL: &str = "KNIGHTWATCH_LIFECYCLE_INTERVAL_SECS";
pub const ENV_MATCHMAKING_INTERVAL: &str = "KNIGHTWATCH_MATCHMAKING_INTERVAL_SECS";
pub const ENV_MOVE_CEILING: &str = "KNIGHTWATCH_MOVE_CEILING";
pub const ENV_PLATFORM_FEE: &str = "KNIGHTWATCH_PLATFORM_FEE";
pub const ENV_SEED: &str = "KNIGHTWATCH_SEED";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Seed for every random source. OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Where to write the JSON status file. Disabled when absent.
    #[serde(default)]
    pub status_file: Option<PathBuf>,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Lifecycle tick and pacing.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Inventory targets and pairing rules.
    #[serde(default)]
    pub matchmaking: MatchmakingConfig,

    /// Stake limits and platform fee.
    #[serde(default)]
    pub betting: BettingConfig,

    /// Readiness retry policy.
    #[serde(default)]
    pub startup: StartupConfig,

    /// Custom roster. The built-in roster is used when empty.
    #[serde(default)]
    pub personalities: Vec<Personality>,
}

impl Config {
    /// Parse configuration from TOML content, applying process environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - An environment override cannot be parsed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with(content, |key| std::env::var(key).ok())
    }

    /// Parse configuration from TOML content with a custom environment
    /// lookup.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load the file if it exists, otherwise start from defaults.
    ///
    /// Environment overrides and validation apply either way.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Apply `KNIGHTWATCH_*` overrides read through `env`.
    #[allow(clippy::result_large_err)]
    pub fn apply_env_overrides<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_override(&env, ENV_MIN_ACTIVE)? {
            self.matchmaking.min_active = v;
        }
        if let Some(v) = parse_override(&env, ENV_MIN_UPCOMING)? {
            self.matchmaking.min_upcoming = v;
        }
        if let Some(v) = parse_override(&env, ENV_LIFECYCLE_INTERVAL)? {
            self.lifecycle.tick_interval_secs = v;
        }
        if let Some(v) = parse_override(&env, ENV_MATCHMAKING_INTERVAL)? {
            self.matchmaking.tick_interval_secs = v;
        }
        if let Some(v) = parse_override(&env, ENV_MOVE_CEILING)? {
            self.lifecycle.move_ceiling = v;
        }
        if let Some(v) = parse_override::<Decimal, _>(&env, ENV_PLATFORM_FEE)? {
            self.betting.platform_fee = v;
        }
        if let Some(v) = parse_override(&env, ENV_SEED)? {
            self.seed = Some(v);
        }
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Checks that all values are within acceptable ranges.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if !self.logging.is_known_format() {
            return Err(invalid("logging.format", "must be \"pretty\" or \"json\""));
        }

        if self.lifecycle.tick_interval_secs == 0 {
            return Err(invalid("lifecycle.tick_interval_secs", "must be greater than 0"));
        }
        if self.lifecycle.move_ceiling == 0 {
            return Err(invalid("lifecycle.move_ceiling", "must be greater than 0"));
        }

        let mm = &self.matchmaking;
        if mm.tick_interval_secs == 0 {
            return Err(invalid("matchmaking.tick_interval_secs", "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&mm.balanced_probability) {
            return Err(invalid(
                "matchmaking.balanced_probability",
                "must be between 0 and 1",
            ));
        }
        if mm.mismatch_min_gap >= mm.mismatch_max_gap {
            return Err(invalid(
                "matchmaking.mismatch_max_gap",
                "must be greater than mismatch_min_gap",
            ));
        }
        if mm.schedule_min_minutes < 0 {
            return Err(invalid("matchmaking.schedule_min_minutes", "must be 0 or greater"));
        }
        if mm.schedule_max_minutes > MAX_SCHEDULE_MINUTES {
            return Err(ConfigError::InvalidValue {
                field: "matchmaking.schedule_max_minutes",
                reason: format!("must be at most {MAX_SCHEDULE_MINUTES}"),
            }
            .into());
        }
        if mm.schedule_min_minutes > mm.schedule_max_minutes {
            return Err(invalid(
                "matchmaking.schedule_max_minutes",
                "must be >= schedule_min_minutes",
            ));
        }

        let betting = &self.betting;
        if betting.platform_fee < Decimal::ZERO || betting.platform_fee >= Decimal::ONE {
            return Err(invalid("betting.platform_fee", "must be in [0, 1)"));
        }
        if betting.min_stake <= Decimal::ZERO {
            return Err(invalid("betting.min_stake", "must be greater than 0"));
        }
        if let Some(max) = betting.max_stake {
            if max < betting.min_stake {
                return Err(invalid("betting.max_stake", "must be >= min_stake"));
            }
        }

        if self.startup.max_attempts == 0 {
            return Err(invalid("startup.max_attempts", "must be greater than 0"));
        }

        if !self.personalities.is_empty() {
            if self.personalities.len() < 2 {
                return Err(invalid("personalities", "at least two are required"));
            }
            let mut seen = HashSet::new();
            for p in &self.personalities {
                if !seen.insert(p.id) {
                    return Err(ConfigError::InvalidValue {
                        field: "personalities",
                        reason: format!("duplicate id {}", p.id),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }

    /// The personality roster: configured entries or the built-in set.
    #[must_use]
    pub fn registry(&self) -> PersonalityRegistry {
        if self.personalities.is_empty() {
            PersonalityRegistry::builtin()
        } else {
            PersonalityRegistry::new(self.personalities.iter().cloned())
        }
    }

    #[must_use]
    pub fn lifecycle_settings(&self) -> LifecycleSettings {
        LifecycleSettings {
            move_ceiling: self.lifecycle.move_ceiling,
            platform_fee: self.betting.platform_fee,
            pacing: (&self.lifecycle.pacing).into(),
        }
    }

    #[must_use]
    pub fn matchmaking_settings(&self) -> MatchmakingSettings {
        (&self.matchmaking).into()
    }

    #[must_use]
    pub fn betting_settings(&self) -> BettingSettings {
        (&self.betting).into()
    }

    #[must_use]
    pub const fn lifecycle_interval(&self) -> Duration {
        Duration::from_secs(self.lifecycle.tick_interval_secs)
    }

    #[must_use]
    pub const fn matchmaking_interval(&self) -> Duration {
        Duration::from_secs(self.matchmaking.tick_interval_secs)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

#[allow(clippy::result_large_err)]
fn parse_override<T, F>(env: &F, key: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = env(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| {
            ConfigError::InvalidValue {
                field: key,
                reason: format!("cannot parse '{raw}': {e}"),
            }
            .into()
        })
}
