//! Handler for the `config` command group.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load_or_default(path)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "seed": config.seed,
            "status_file": config.status_file.as_ref().map(|p| p.display().to_string()),
            "logging": { "level": config.logging.level, "format": config.logging.format },
            "lifecycle": {
                "tick_interval_secs": config.lifecycle.tick_interval_secs,
                "move_ceiling": config.lifecycle.move_ceiling,
                "pacing": {
                    "base_ms": config.lifecycle.pacing.base_ms,
                    "complex_ms": config.lifecycle.pacing.complex_ms,
                    "jitter_ms": config.lifecycle.pacing.jitter_ms,
                    "complex_move_threshold": config.lifecycle.pacing.complex_move_threshold,
                },
            },
            "matchmaking": {
                "tick_interval_secs": config.matchmaking.tick_interval_secs,
                "min_active": config.matchmaking.min_active,
                "min_upcoming": config.matchmaking.min_upcoming,
            },
            "betting": {
                "platform_fee": config.betting.platform_fee.to_string(),
                "min_stake": config.betting.min_stake.to_string(),
                "max_stake": config.betting.max_stake.map(|d| d.to_string()),
            },
            "personalities": config.registry().len(),
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field(
        "Seed",
        config.seed.map_or_else(|| "entropy".to_string(), |s| s.to_string()),
    );
    output::field("Log level", &config.logging.level);
    output::field("Log format", &config.logging.format);

    output::section("Lifecycle");
    output::field("Tick", format!("{}s", config.lifecycle.tick_interval_secs));
    output::field("Move ceiling", config.lifecycle.move_ceiling);
    output::field(
        "Pacing",
        format!(
            "{}ms base, {}ms complex, {}ms jitter",
            config.lifecycle.pacing.base_ms,
            config.lifecycle.pacing.complex_ms,
            config.lifecycle.pacing.jitter_ms
        ),
    );

    output::section("Matchmaking");
    output::field("Tick", format!("{}s", config.matchmaking.tick_interval_secs));
    output::field("Min active", config.matchmaking.min_active);
    output::field("Min upcoming", config.matchmaking.min_upcoming);

    output::section("Betting");
    output::field("Platform fee", config.betting.platform_fee);
    output::field("Min stake", config.betting.min_stake);
    output::field(
        "Max stake",
        config
            .betting
            .max_stake
            .map_or_else(|| "none".to_string(), |d| d.to_string()),
    );

    output::section("Roster");
    output::field("Personalities", config.registry().len());
    Ok(())
}

/// Execute `config validate`. The file must exist.
pub fn execute_validate(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ConfigError::MissingField {
            field: "config file",
        }
        .into());
    }
    Config::load(path)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "path": path.display().to_string(),
            "valid": true,
        }));
        return Ok(());
    }
    output::success(&format!("{} is valid", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn validate_accepts_good_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[matchmaking]\nmin_active = 3").unwrap();
        execute_validate(file.path()).unwrap();
    }

    #[test]
    fn validate_rejects_missing_file() {
        let err = execute_validate(Path::new("/nonexistent/knightwatch.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingField { .. })));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[betting]\nplatform_fee = \"1.5\"").unwrap();
        let err = execute_validate(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidValue { .. })));
    }
}
