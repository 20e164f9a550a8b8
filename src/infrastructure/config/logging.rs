//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// `pretty` or `json`.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".into()
}

fn default_format() -> String {
    "pretty".into()
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// `RUST_LOG` takes precedence over the configured level.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }

    /// Raise the level for each `-v` given on the command line.
    ///
    /// Never lowers a level that is already more verbose.
    #[must_use]
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        let requested = match verbose {
            0 => return self,
            1 => "debug",
            _ => "trace",
        };
        let current = match self.level.to_ascii_lowercase().as_str() {
            "trace" => 2,
            "debug" => 1,
            _ => 0,
        };
        if current < verbose.min(2) {
            self.level = requested.to_string();
        }
        self
    }

    /// Check if the format is one the subscriber understands.
    #[must_use]
    pub fn is_known_format(&self) -> bool {
        matches!(self.format.as_str(), "pretty" | "json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.into(),
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn verbose_flags_raise_the_level() {
        assert_eq!(at("info").with_verbosity(0).level, "info");
        assert_eq!(at("info").with_verbosity(1).level, "debug");
        assert_eq!(at("warn").with_verbosity(3).level, "trace");
    }

    #[test]
    fn verbose_flags_never_lower_the_level() {
        assert_eq!(at("trace").with_verbosity(1).level, "trace");
        assert_eq!(at("debug").with_verbosity(1).level, "debug");
    }
}
