//! Spectator betting: placement, pools, implied odds and claims.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;

use crate::application::context::ArenaContext;
use crate::domain::bet::Bet;
use crate::domain::error::DomainError;
use crate::domain::id::{BetId, BettorId, MatchId};
use crate::domain::outcome::Outcome;
use crate::domain::pool::Pool;
use crate::error::{Error, Result};
use crate::port::outbound::notifier::{ArenaEvent, BetEvent};

/// Stake limits and fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BettingSettings {
    pub platform_fee: Decimal,
    pub min_stake: Decimal,
    pub max_stake: Option<Decimal>,
}

impl Default for BettingSettings {
    fn default() -> Self {
        Self {
            platform_fee: Decimal::new(5, 2),
            min_stake: Decimal::new(1, 2),
            max_stake: None,
        }
    }
}

impl BettingSettings {
    /// Check a stake against the configured range.
    pub fn check_stake(&self, amount: Decimal) -> std::result::Result<(), DomainError> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::NonPositiveStake { amount });
        }
        if amount < self.min_stake {
            return Err(DomainError::StakeBelowMinimum {
                amount,
                min: self.min_stake,
            });
        }
        if let Some(max) = self.max_stake {
            if amount > max {
                return Err(DomainError::StakeAboveMaximum { amount, max });
            }
        }
        Ok(())
    }
}

/// Implied decimal payout multiplier per outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Odds {
    pub white: Option<Decimal>,
    pub black: Option<Decimal>,
    pub draw: Option<Decimal>,
}

impl Odds {
    /// Odds implied by `pool` after the platform fee.
    #[must_use]
    pub fn from_pool(pool: &Pool, fee: Decimal) -> Self {
        let multiplier = |outcome| {
            let staked = pool.get(outcome);
            if staked.is_zero() {
                return None;
            }
            let raw = pool.total() / staked * (Decimal::ONE - fee);
            Some(raw.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero))
        };
        Self {
            white: multiplier(Outcome::White),
            black: multiplier(Outcome::Black),
            draw: multiplier(Outcome::Draw),
        }
    }

    #[must_use]
    pub const fn get(&self, outcome: Outcome) -> Option<Decimal> {
        match outcome {
            Outcome::White => self.white,
            Outcome::Black => self.black,
            Outcome::Draw => self.draw,
        }
    }
}

/// Betting use cases.
pub struct BettingService {
    ctx: ArenaContext,
    settings: BettingSettings,
}

impl BettingService {
    #[must_use]
    pub const fn new(ctx: ArenaContext, settings: BettingSettings) -> Self {
        Self { ctx, settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &BettingSettings {
        &self.settings
    }

    /// Place a bet on a scheduled match.
    ///
    /// The lock check, the pool increment and the bet insert happen under
    /// the match lock and land in one store commit.
    pub async fn place_bet(
        &self,
        match_id: MatchId,
        bettor: BettorId,
        outcome: Outcome,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Bet> {
        self.settings.check_stake(amount)?;

        let guard = self.ctx.locks.acquire(match_id).await;
        let placed = self.place_locked(match_id, bettor, outcome, amount, now).await;
        drop(guard);
        if placed.is_err() {
            self.ctx.locks.prune(match_id);
        }
        placed
    }

    async fn place_locked(
        &self,
        match_id: MatchId,
        bettor: BettorId,
        outcome: Outcome,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Bet> {
        let mut m = self
            .ctx
            .store
            .get_match(match_id)
            .await?
            .ok_or(Error::MatchNotFound(match_id))?;

        let bet = Bet::new(match_id, bettor, outcome, amount, now)?;
        m.record_stake(outcome, amount)?;
        self.ctx.store.commit_bet(&m, &bet).await?;

        info!(
            match_id = %match_id,
            bet_id = %bet.id(),
            bettor = %bet.bettor(),
            outcome = %outcome,
            amount = %amount,
            "Bet placed"
        );
        self.ctx.emit(ArenaEvent::BetPlaced(BetEvent::from(&bet)));
        Ok(bet)
    }

    /// Current pool of a match.
    pub async fn pool(&self, match_id: MatchId) -> Result<Pool> {
        let m = self
            .ctx
            .store
            .get_match(match_id)
            .await?
            .ok_or(Error::MatchNotFound(match_id))?;
        Ok(*m.pool())
    }

    /// Implied payout multipliers for a match.
    pub async fn odds(&self, match_id: MatchId) -> Result<Odds> {
        let pool = self.pool(match_id).await?;
        Ok(Odds::from_pool(&pool, self.settings.platform_fee))
    }

    /// Won bets of `bettor` that have not been claimed yet.
    pub async fn claimable(&self, bettor: &BettorId) -> Result<Vec<Bet>> {
        let bets = self.ctx.store.bets_by_bettor(bettor).await?;
        Ok(bets.into_iter().filter(Bet::is_claimable).collect())
    }

    /// Record that the payout of `bet_id` was transferred to `bettor`.
    ///
    /// Returns the claimed amount.
    pub async fn mark_claimed(&self, bet_id: &BetId, bettor: &BettorId) -> Result<Decimal> {
        let bet = self
            .ctx
            .store
            .get_bet(bet_id)
            .await?
            .ok_or_else(|| Error::BetNotFound(bet_id.clone()))?;

        let match_id = bet.match_id();
        let guard = self.ctx.locks.acquire(match_id).await;
        let result = self.claim_locked(bet, bet_id, bettor).await;
        drop(guard);
        // Bets are only claimable once their match is completed.
        self.ctx.locks.prune(match_id);
        result
    }

    async fn claim_locked(&self, mut bet: Bet, bet_id: &BetId, bettor: &BettorId) -> Result<Decimal> {
        // Re-read under the lock in case of a concurrent claim.
        if let Some(fresh) = self.ctx.store.get_bet(bet_id).await? {
            bet = fresh;
        }

        let amount = bet.claim(bettor)?;
        self.ctx.store.update_bet(&bet).await?;
        info!(bet_id = %bet_id, bettor = %bettor, amount = %amount, "Payout claimed");
        Ok(amount)
    }

    /// Every bet placed by `bettor`, oldest first.
    pub async fn bets_for(&self, bettor: &BettorId) -> Result<Vec<Bet>> {
        self.ctx.store.bets_by_bettor(bettor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapter::outbound::memory::MemoryStore;
    use crate::domain::fixture::{MatchType, NewMatch};
    use crate::domain::id::PersonalityId;
    use crate::domain::personality::PersonalityRegistry;
    use crate::port::outbound::notifier::NotifierRegistry;
    use crate::port::outbound::store::MatchStore;
    use rust_decimal_macros::dec;

    fn service(store: Arc<MemoryStore>, settings: BettingSettings) -> BettingService {
        let ctx = ArenaContext::new(
            store,
            Arc::new(PersonalityRegistry::builtin()),
            Arc::new(NotifierRegistry::new()),
        );
        BettingService::new(ctx, settings)
    }

    async fn upcoming(store: &MemoryStore) -> MatchId {
        store
            .insert_match(NewMatch::scheduled(
                PersonalityId::new(1),
                PersonalityId::new(2),
                MatchType::Regular,
                "3+2",
                Utc::now() + chrono::Duration::hours(1),
            ))
            .await
            .unwrap()
            .id()
    }

    #[test]
    fn stake_range_is_enforced() {
        let settings = BettingSettings {
            max_stake: Some(dec!(100)),
            ..BettingSettings::default()
        };
        assert!(settings.check_stake(dec!(0.01)).is_ok());
        assert!(settings.check_stake(dec!(100)).is_ok());
        assert!(matches!(
            settings.check_stake(dec!(0)),
            Err(DomainError::NonPositiveStake { .. })
        ));
        assert!(matches!(
            settings.check_stake(dec!(0.001)),
            Err(DomainError::StakeBelowMinimum { .. })
        ));
        assert!(matches!(
            settings.check_stake(dec!(100.5)),
            Err(DomainError::StakeAboveMaximum { .. })
        ));
    }

    #[test]
    fn odds_follow_pool_shares() {
        let pool = Pool {
            white: dec!(10),
            black: dec!(5),
            draw: dec!(0),
        };
        let odds = Odds::from_pool(&pool, dec!(0.05));
        assert_eq!(odds.white, Some(dec!(1.425)));
        assert_eq!(odds.black, Some(dec!(2.85)));
        assert_eq!(odds.draw, None);
        assert_eq!(odds.get(Outcome::Black), odds.black);
    }

    #[tokio::test]
    async fn place_bet_updates_pool() {
        let store = Arc::new(MemoryStore::new());
        let betting = service(store.clone(), BettingSettings::default());
        let id = upcoming(&store).await;

        betting
            .place_bet(id, BettorId::new("0xa"), Outcome::White, dec!(3), Utc::now())
            .await
            .unwrap();
        betting
            .place_bet(id, BettorId::new("0xb"), Outcome::Draw, dec!(1.5), Utc::now())
            .await
            .unwrap();

        let pool = betting.pool(id).await.unwrap();
        assert_eq!(pool.white, dec!(3));
        assert_eq!(pool.draw, dec!(1.5));
        assert_eq!(pool.total(), dec!(4.5));
    }

    #[tokio::test]
    async fn bets_rejected_once_match_starts() {
        let store = Arc::new(MemoryStore::new());
        let betting = service(store.clone(), BettingSettings::default());
        let id = upcoming(&store).await;

        let mut m = store.get_match(id).await.unwrap().unwrap();
        m.start().unwrap();
        store.update_match(&m).await.unwrap();

        let err = betting
            .place_bet(id, BettorId::new("0xa"), Outcome::White, dec!(1), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Domain(DomainError::BetsLocked { .. })));
        assert!(betting.pool(id).await.unwrap().is_empty());
        assert!(betting.bets_for(&BettorId::new("0xa")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_match_is_reported() {
        let store = Arc::new(MemoryStore::new());
        let betting = service(store, BettingSettings::default());
        let err = betting
            .place_bet(
                MatchId::new(404),
                BettorId::new("0xa"),
                Outcome::White,
                dec!(1),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MatchNotFound(_)));
    }

    #[tokio::test]
    async fn nothing_claimable_before_settlement() {
        let store = Arc::new(MemoryStore::new());
        let betting = service(store.clone(), BettingSettings::default());
        let id = upcoming(&store).await;
        let bet = betting
            .place_bet(id, BettorId::new("0xa"), Outcome::White, dec!(2), Utc::now())
            .await
            .unwrap();

        assert!(betting.claimable(&BettorId::new("0xa")).await.unwrap().is_empty());
        let err = betting
            .mark_claimed(bet.id(), &BettorId::new("0xa"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Domain(DomainError::NotClaimable { .. })));
    }
}
