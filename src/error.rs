use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::id::{BetId, MatchId, PersonalityId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors reported by the chess rules engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("invalid move notation '{san}'")]
    InvalidNotation { san: String },

    #[error("illegal move '{san}': {reason}")]
    IllegalMove { san: String, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("bet {0} not found")]
    BetNotFound(BetId),

    #[error("unknown personality {0}")]
    UnknownPersonality(PersonalityId),

    #[error("corrupt move history at ply {ply}: {source}")]
    CorruptHistory {
        ply: usize,
        #[source]
        source: RulesError,
    },

    #[error("store error: {0}")]
    Store(String),

    #[error("startup failed after {attempts} attempts: {reason}")]
    Startup { attempts: u32, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
