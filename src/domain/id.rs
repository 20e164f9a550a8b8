//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Personality identifier - small integer key from the static roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonalityId(u32);

impl PersonalityId {
    /// Create a new `PersonalityId`.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw integer value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PersonalityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PersonalityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Match identifier - assigned sequentially by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(u64);

impl MatchId {
    /// Create a new `MatchId`.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw integer value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MatchId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Unique identifier for a placed bet.
///
/// Generated as UUID v4 for new bets, or constructed from
/// an existing string for persistence/deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BetId(String);

impl BetId {
    /// Create a new `BetId` with a generated UUID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the bet ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque bettor identity, typically a wallet address.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BettorId(String);

impl BettorId {
    /// Create a new `BettorId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the bettor identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BettorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BettorId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for BettorId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
