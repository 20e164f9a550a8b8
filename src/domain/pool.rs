//! Per-outcome stake pools.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::outcome::Outcome;

/// Aggregate stake per possible match outcome.
///
/// Always equal to the sum of the amounts of the bets placed on the match,
/// grouped by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub white: Decimal,
    pub black: Decimal,
    pub draw: Decimal,
}

impl Pool {
    /// Stake on a single outcome.
    #[must_use]
    pub const fn get(&self, outcome: Outcome) -> Decimal {
        match outcome {
            Outcome::White => self.white,
            Outcome::Black => self.black,
            Outcome::Draw => self.draw,
        }
    }

    /// Add stake to an outcome.
    pub fn add(&mut self, outcome: Outcome, amount: Decimal) {
        match outcome {
            Outcome::White => self.white += amount,
            Outcome::Black => self.black += amount,
            Outcome::Draw => self.draw += amount,
        }
    }

    /// Total stake across all outcomes.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.white + self.black + self.draw
    }

    /// Check if nothing has been staked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total().is_zero()
    }
}
