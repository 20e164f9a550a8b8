//! In-memory arena store.
//!
//! All tables live behind a single lock so the multi-record commits are
//! atomic with respect to every reader.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::bet::Bet;
use crate::domain::fixture::{Match, MatchStatus, NewMatch};
use crate::domain::id::{BetId, BettorId, MatchId, PersonalityId};
use crate::domain::pool::Pool;
use crate::error::{Error, Result};
use crate::port::outbound::store::{ArenaStore, BetStore, MatchStore};

#[derive(Debug, Default)]
struct Tables {
    matches: BTreeMap<MatchId, Match>,
    /// Bets in placement order.
    bets: Vec<Bet>,
    bet_index: HashMap<BetId, usize>,
    next_match_id: u64,
}

impl Tables {
    fn put_match(&mut self, updated: &Match) -> Result<()> {
        let slot = self
            .matches
            .get_mut(&updated.id())
            .ok_or(Error::MatchNotFound(updated.id()))?;
        *slot = updated.clone();
        Ok(())
    }

    fn put_bet(&mut self, bet: &Bet) {
        match self.bet_index.get(bet.id()) {
            Some(&idx) => self.bets[idx] = bet.clone(),
            None => {
                self.bet_index.insert(bet.id().clone(), self.bets.len());
                self.bets.push(bet.clone());
            }
        }
    }
}

/// In-memory store for the arena and its tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored matches.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.tables.read().matches.len()
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn insert_match(&self, new: NewMatch) -> Result<Match> {
        let mut tables = self.tables.write();
        tables.next_match_id += 1;
        let id = MatchId::new(tables.next_match_id);
        let stored = Match::from_new(id, new);
        tables.matches.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
        Ok(self.tables.read().matches.get(&id).cloned())
    }

    async fn update_match(&self, updated: &Match) -> Result<()> {
        self.tables.write().put_match(updated)
    }

    async fn matches_by_status(&self, status: MatchStatus) -> Result<Vec<Match>> {
        let tables = self.tables.read();
        Ok(tables
            .matches
            .values()
            .filter(|m| m.status() == status)
            .cloned()
            .collect())
    }

    async fn matches_by_personality(&self, personality: PersonalityId) -> Result<Vec<Match>> {
        let tables = self.tables.read();
        Ok(tables
            .matches
            .values()
            .filter(|m| m.involves(personality))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BetStore for MemoryStore {
    async fn get_bet(&self, id: &BetId) -> Result<Option<Bet>> {
        let tables = self.tables.read();
        Ok(tables.bet_index.get(id).map(|&idx| tables.bets[idx].clone()))
    }

    async fn update_bet(&self, updated: &Bet) -> Result<()> {
        let mut tables = self.tables.write();
        if !tables.bet_index.contains_key(updated.id()) {
            return Err(Error::BetNotFound(updated.id().clone()));
        }
        tables.put_bet(updated);
        Ok(())
    }

    async fn bets_by_match(&self, match_id: MatchId) -> Result<Vec<Bet>> {
        let tables = self.tables.read();
        Ok(tables
            .bets
            .iter()
            .filter(|b| b.match_id() == match_id)
            .cloned()
            .collect())
    }

    async fn bets_by_bettor(&self, bettor: &BettorId) -> Result<Vec<Bet>> {
        let tables = self.tables.read();
        Ok(tables
            .bets
            .iter()
            .filter(|b| b.bettor() == bettor)
            .cloned()
            .collect())
    }

    async fn pool_totals(&self, match_id: MatchId) -> Result<Pool> {
        let tables = self.tables.read();
        let mut pool = Pool::default();
        for bet in tables.bets.iter().filter(|b| b.match_id() == match_id) {
            pool.add(bet.outcome(), bet.amount());
        }
        Ok(pool)
    }
}

#[async_trait]
impl ArenaStore for MemoryStore {
    async fn commit_bet(&self, updated: &Match, bet: &Bet) -> Result<()> {
        let mut tables = self.tables.write();
        tables.put_match(updated)?;
        tables.put_bet(bet);
        Ok(())
    }

    async fn commit_settlement(&self, completed: &Match, bets: &[Bet]) -> Result<()> {
        let mut tables = self.tables.write();
        if let Some(missing) = bets.iter().find(|b| !tables.bet_index.contains_key(b.id())) {
            return Err(Error::BetNotFound(missing.id().clone()));
        }
        tables.put_match(completed)?;
        for bet in bets {
            tables.put_bet(bet);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixture::MatchType;
    use crate::domain::outcome::Outcome;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn scheduled(white: u32, black: u32) -> NewMatch {
        NewMatch::scheduled(
            PersonalityId::new(white),
            PersonalityId::new(black),
            MatchType::Regular,
            "5+0",
            Utc::now() + chrono::Duration::minutes(20),
        )
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.insert_match(scheduled(1, 2)).await.unwrap();
        let b = store.insert_match(scheduled(3, 4)).await.unwrap();
        assert_eq!(a.id(), MatchId::new(1));
        assert_eq!(b.id(), MatchId::new(2));
        assert_eq!(store.match_count(), 2);
    }

    #[tokio::test]
    async fn filters_by_status_and_personality() {
        let store = MemoryStore::new();
        let mut a = store.insert_match(scheduled(1, 2)).await.unwrap();
        store.insert_match(scheduled(3, 1)).await.unwrap();
        a.start().unwrap();
        store.update_match(&a).await.unwrap();

        let live = store.matches_by_status(MatchStatus::InProgress).await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id(), a.id());

        let involving = store
            .matches_by_personality(PersonalityId::new(1))
            .await
            .unwrap();
        assert_eq!(involving.len(), 2);
    }

    #[tokio::test]
    async fn update_unknown_match_fails() {
        let store = MemoryStore::new();
        let ghost = Match::from_new(MatchId::new(42), scheduled(1, 2));
        assert!(matches!(
            store.update_match(&ghost).await,
            Err(Error::MatchNotFound(_))
        ));
    }

    #[tokio::test]
    async fn commit_bet_writes_match_and_bet_together() {
        let store = MemoryStore::new();
        let mut m = store.insert_match(scheduled(1, 2)).await.unwrap();
        let bet = Bet::new(
            m.id(),
            BettorId::new("0xabc"),
            Outcome::White,
            dec!(2.5),
            Utc::now(),
        )
        .unwrap();
        m.record_stake(bet.outcome(), bet.amount()).unwrap();
        store.commit_bet(&m, &bet).await.unwrap();

        let stored = store.get_match(m.id()).await.unwrap().unwrap();
        assert_eq!(stored.pool().white, dec!(2.5));
        assert_eq!(store.pool_totals(m.id()).await.unwrap(), *stored.pool());
        assert!(store.get_bet(bet.id()).await.unwrap().is_some());
        assert_eq!(
            store
                .bets_by_bettor(&BettorId::new("0xabc"))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn settlement_rejects_unknown_bets() {
        let store = MemoryStore::new();
        let mut m = store.insert_match(scheduled(1, 2)).await.unwrap();
        m.start().unwrap();
        m.complete(Outcome::Draw, Utc::now()).unwrap();
        let stray = Bet::new(
            m.id(),
            BettorId::new("0xabc"),
            Outcome::Draw,
            dec!(1),
            Utc::now(),
        )
        .unwrap();

        let err = store.commit_settlement(&m, &[stray]).await.unwrap_err();
        assert!(matches!(err, Error::BetNotFound(_)));
        let stored = store.get_match(m.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), MatchStatus::Scheduled);
    }
}
