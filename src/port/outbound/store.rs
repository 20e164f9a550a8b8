//! Persistence ports for matches and bets.
//!
//! The arena does not prescribe a storage engine. Adapters must make the two
//! `commit_*` operations atomic: a reader never observes a pool increment
//! without its bet, or a completed match with unsettled bets.

use async_trait::async_trait;

use crate::domain::bet::Bet;
use crate::domain::fixture::{Match, MatchStatus, NewMatch};
use crate::domain::id::{BetId, BettorId, MatchId, PersonalityId};
use crate::domain::pool::Pool;
use crate::error::Result;

/// Storage operations for matches.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Insert a new match, assigning its id.
    async fn insert_match(&self, new: NewMatch) -> Result<Match>;

    /// Get a match by ID.
    async fn get_match(&self, id: MatchId) -> Result<Option<Match>>;

    /// Replace a stored match.
    async fn update_match(&self, updated: &Match) -> Result<()>;

    /// All matches with the given status, ordered by id.
    async fn matches_by_status(&self, status: MatchStatus) -> Result<Vec<Match>>;

    /// All matches a personality plays in, ordered by id.
    async fn matches_by_personality(&self, personality: PersonalityId) -> Result<Vec<Match>>;
}

/// Storage operations for bets.
#[async_trait]
pub trait BetStore: Send + Sync {
    /// Get a bet by ID.
    async fn get_bet(&self, id: &BetId) -> Result<Option<Bet>>;

    /// Replace a stored bet.
    async fn update_bet(&self, updated: &Bet) -> Result<()>;

    /// All bets on a match, in placement order.
    async fn bets_by_match(&self, match_id: MatchId) -> Result<Vec<Bet>>;

    /// All bets placed by a bettor, in placement order.
    async fn bets_by_bettor(&self, bettor: &BettorId) -> Result<Vec<Bet>>;

    /// Pool totals computed from the stored bets of a match.
    async fn pool_totals(&self, match_id: MatchId) -> Result<Pool>;
}

/// Combined store with the atomic multi-record commits the arena relies on.
#[async_trait]
pub trait ArenaStore: MatchStore + BetStore {
    /// Persist a match whose pool was incremented together with the new bet.
    async fn commit_bet(&self, updated: &Match, bet: &Bet) -> Result<()>;

    /// Persist a completed match together with its settled bets.
    async fn commit_settlement(&self, completed: &Match, bets: &[Bet]) -> Result<()>;

    /// Readiness probe used during startup.
    async fn ping(&self) -> Result<()>;
}
