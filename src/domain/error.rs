//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated:
//! illegal status transitions, stakes on locked matches, and claims against
//! bets that are not claimable.
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use knightwatch::domain::error::DomainError;
//! use knightwatch::domain::fixture::{Match, MatchType, NewMatch};
//! use knightwatch::domain::id::{MatchId, PersonalityId};
//! use knightwatch::domain::outcome::Outcome;
//! use rust_decimal_macros::dec;
//!
//! let mut m = Match::from_new(
//!     MatchId::new(1),
//!     NewMatch::immediate(
//!         PersonalityId::new(1),
//!         PersonalityId::new(2),
//!         MatchType::Regular,
//!         "5+0",
//!         Utc::now(),
//!     ),
//! );
//!
//! // Immediate matches start with betting already closed
//! let result = m.record_stake(Outcome::White, dec!(10));
//! assert!(matches!(result, Err(DomainError::BetsLocked { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use super::bet::BetStatus;
use super::fixture::MatchStatus;
use super::id::{BetId, MatchId};

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Status transitions only move forward.
    #[error("match {match_id} cannot move from {from} to {to}")]
    InvalidTransition {
        match_id: MatchId,
        from: MatchStatus,
        to: MatchStatus,
    },

    /// Moves can only be appended while the match is being played.
    #[error("match {match_id} is not in progress (status {status})")]
    MatchNotInProgress {
        match_id: MatchId,
        status: MatchStatus,
    },

    /// Betting has closed for this match.
    #[error("betting is locked for match {match_id}")]
    BetsLocked { match_id: MatchId },

    /// Stakes must be strictly positive.
    #[error("stake must be positive, got {amount}")]
    NonPositiveStake { amount: Decimal },

    /// Stake below the configured minimum.
    #[error("stake {amount} is below the minimum of {min}")]
    StakeBelowMinimum { amount: Decimal, min: Decimal },

    /// Stake above the configured maximum.
    #[error("stake {amount} exceeds the maximum of {max}")]
    StakeAboveMaximum { amount: Decimal, max: Decimal },

    /// A personality cannot play itself.
    #[error("a match needs two distinct personalities")]
    SamePersonality,

    /// Settlement touches each bet at most once.
    #[error("bet {bet_id} already settled as {status}")]
    AlreadySettled { bet_id: BetId, status: BetStatus },

    /// Only won, unclaimed bets of the claiming bettor can be claimed.
    #[error("bet {bet_id} is not claimable: {reason}")]
    NotClaimable { bet_id: BetId, reason: String },
}
