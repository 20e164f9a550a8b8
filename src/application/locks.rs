//! Per-match mutual exclusion.
//!
//! Every mutation of a match (promotion, move commit, completion, bet
//! placement) runs under that match's lock, so check-then-act on
//! `bets_locked` or on the move history is serialized per match id while
//! different matches proceed in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::id::MatchId;

/// Async lock table keyed by match id.
#[derive(Debug, Default)]
pub struct MatchLocks {
    locks: DashMap<MatchId, Arc<Mutex<()>>>,
}

impl MatchLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn acquire(&self, id: MatchId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the shard guard is released before awaiting.
        let lock = self.locks.entry(id).or_default().clone();
        lock.lock_owned().await
    }

    /// Remove the entry of `id` when no task holds or waits on it.
    ///
    /// Must be called after the caller's guard is dropped. The check and the
    /// removal happen under the shard lock, so a concurrent [`acquire`]
    /// either sees the old entry still in use or creates a fresh one.
    ///
    /// [`acquire`]: MatchLocks::acquire
    pub fn prune(&self, id: MatchId) -> bool {
        self.locks
            .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1)
            .is_some()
    }

    /// Number of tracked locks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_match_is_exclusive() {
        let locks = Arc::new(MatchLocks::new());
        let guard = locks.acquire(MatchId::new(1)).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire(MatchId::new(1)).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_matches_do_not_block() {
        let locks = MatchLocks::new();
        let _a = locks.acquire(MatchId::new(1)).await;
        let _b = locks.acquire(MatchId::new(2)).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn prune_removes_idle_entry() {
        let locks = MatchLocks::new();
        drop(locks.acquire(MatchId::new(9)).await);
        assert!(locks.prune(MatchId::new(9)));
        assert!(locks.is_empty());
        assert!(!locks.prune(MatchId::new(9)));
    }

    #[tokio::test]
    async fn prune_keeps_entry_while_held_or_awaited() {
        let locks = Arc::new(MatchLocks::new());
        let id = MatchId::new(4);
        let guard = locks.acquire(id).await;
        assert!(!locks.prune(id));

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire(id).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);
        // The waiter now owns the lock and still shares the entry.
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(!locks.prune(id));

        // A newcomer queues behind the waiter instead of racing it.
        let newcomer = tokio::time::timeout(Duration::from_millis(5), locks.acquire(id)).await;
        assert!(newcomer.is_err());

        waiter.await.unwrap();
        assert!(locks.prune(id));
        assert!(locks.is_empty());
    }
}
