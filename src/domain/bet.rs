//! Spectator bets on match outcomes.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{BetId, BettorId, MatchId};
use super::outcome::Outcome;

/// Settlement status of a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Active,
    Won,
    Lost,
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Won => write!(f, "won"),
            Self::Lost => write!(f, "lost"),
        }
    }
}

/// A stake placed by a bettor on one outcome of a match.
///
/// `payout` is set iff `status == Won`, and `claimed` can only become true
/// for a won bet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    id: BetId,
    match_id: MatchId,
    bettor: BettorId,
    amount: Decimal,
    outcome: Outcome,
    status: BetStatus,
    claimed: bool,
    payout: Option<Decimal>,
    placed_at: DateTime<Utc>,
}

impl Bet {
    /// Create a new active bet.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonPositiveStake`] if `amount` is zero or negative.
    pub fn new(
        match_id: MatchId,
        bettor: BettorId,
        outcome: Outcome,
        amount: Decimal,
        placed_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::NonPositiveStake { amount });
        }
        Ok(Self {
            id: BetId::new(),
            match_id,
            bettor,
            amount,
            outcome,
            status: BetStatus::Active,
            claimed: false,
            payout: None,
            placed_at,
        })
    }

    #[must_use]
    pub const fn id(&self) -> &BetId {
        &self.id
    }

    #[must_use]
    pub const fn match_id(&self) -> MatchId {
        self.match_id
    }

    #[must_use]
    pub const fn bettor(&self) -> &BettorId {
        &self.bettor
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub const fn status(&self) -> BetStatus {
        self.status
    }

    #[must_use]
    pub const fn claimed(&self) -> bool {
        self.claimed
    }

    #[must_use]
    pub const fn payout(&self) -> Option<Decimal> {
        self.payout
    }

    #[must_use]
    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    /// Check if the bet has not been settled yet.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == BetStatus::Active
    }

    /// Check if the bet is won and still awaiting a claim.
    #[must_use]
    pub fn is_claimable(&self) -> bool {
        self.status == BetStatus::Won && !self.claimed
    }

    /// Active -> Won with the computed payout.
    pub fn mark_won(&mut self, payout: Decimal) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.status = BetStatus::Won;
        self.payout = Some(payout);
        Ok(())
    }

    /// Active -> Lost. No payout.
    pub fn mark_lost(&mut self) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.status = BetStatus::Lost;
        Ok(())
    }

    /// Flip `claimed` after the external transfer succeeded.
    ///
    /// Returns the payout that was claimed.
    pub fn claim(&mut self, by: &BettorId) -> Result<Decimal, DomainError> {
        let reason = if &self.bettor != by {
            Some("bettor does not own this bet")
        } else if self.status != BetStatus::Won {
            Some("bet has not been won")
        } else if self.claimed {
            Some("bet already claimed")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(DomainError::NotClaimable {
                bet_id: self.id.clone(),
                reason: reason.to_string(),
            });
        }

        self.claimed = true;
        Ok(self.payout.unwrap_or(Decimal::ZERO))
    }

    fn ensure_active(&self) -> Result<(), DomainError> {
        if self.status != BetStatus::Active {
            return Err(DomainError::AlreadySettled {
                bet_id: self.id.clone(),
                status: self.status,
            });
        }
        Ok(())
    }
}
