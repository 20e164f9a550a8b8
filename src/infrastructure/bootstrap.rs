//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::adapter::outbound::chess::ShakmatyRules;
use crate::application::betting::BettingService;
use crate::application::context::ArenaContext;
use crate::application::lifecycle::LifecycleManager;
use crate::application::matchmaking::Matchmaker;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::startup::StartupConfig;
use crate::infrastructure::status::{StatusConfig, StatusNotifier, StatusWriter};
use crate::port::outbound::notifier::{LogNotifier, NotifierRegistry};
use crate::port::outbound::store::ArenaStore;

/// Fully wired arena services sharing one store.
pub struct Arena {
    pub ctx: ArenaContext,
    pub lifecycle: Arc<LifecycleManager<ShakmatyRules>>,
    pub matchmaker: Arc<Matchmaker>,
    pub betting: Arc<BettingService>,
    pub status: Option<Arc<StatusWriter>>,
}

impl Arena {
    /// Wire every service from `config` on top of `store`.
    pub fn build(config: &Config, store: Arc<dyn ArenaStore>) -> Self {
        let status = build_status_writer(config);
        let notifiers = Arc::new(build_notifier_registry(status.clone()));
        info!(notifiers = notifiers.len(), "Notifiers initialized");

        let registry = Arc::new(config.registry());
        info!(personalities = registry.len(), "Roster loaded");

        let ctx = ArenaContext::new(store, registry, notifiers);
        let lifecycle = Arc::new(LifecycleManager::new(
            ctx.clone(),
            Arc::new(ShakmatyRules::new()),
            config.lifecycle_settings(),
            rng_from_seed(config.seed),
        ));
        let matchmaker = Arc::new(Matchmaker::new(
            ctx.clone(),
            config.matchmaking_settings(),
            rng_from_seed(config.seed.map(|seed| seed.wrapping_add(1))),
        ));
        let betting = Arc::new(BettingService::new(ctx.clone(), config.betting_settings()));

        Self {
            ctx,
            lifecycle,
            matchmaker,
            betting,
            status,
        }
    }
}

/// Build notifier registry: structured logs always, status file when enabled.
pub(crate) fn build_notifier_registry(status: Option<Arc<StatusWriter>>) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    if let Some(writer) = status {
        registry.register(Box::new(StatusNotifier::new(writer)));
    }
    registry
}

fn build_status_writer(config: &Config) -> Option<Arc<StatusWriter>> {
    let path = config.status_file.clone()?;
    let settings = config.lifecycle_settings();
    let matchmaking = config.matchmaking_settings();
    info!(path = %path.display(), "Status file enabled");
    Some(Arc::new(StatusWriter::new(
        path,
        StatusConfig {
            personalities: config.registry().len(),
            min_active: matchmaking.min_active,
            min_upcoming: matchmaking.min_upcoming,
            move_ceiling: settings.move_ceiling,
            platform_fee: settings.platform_fee,
        },
    )))
}

/// Deterministic generator when seeded, OS entropy otherwise.
#[must_use]
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Probe the store until it answers, with a bounded number of attempts.
pub async fn wait_until_ready(store: &dyn ArenaStore, startup: &StartupConfig) -> Result<()> {
    let attempts = startup.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match store.ping().await {
            Ok(()) => {
                if attempt > 1 {
                    info!(attempt, "Store ready");
                }
                return Ok(());
            }
            Err(e) => {
                warn!(attempt, max_attempts = attempts, error = %e, "Store not ready");
                last_error = e.to_string();
                if attempt < attempts {
                    tokio::time::sleep(startup.retry_delay()).await;
                }
            }
        }
    }

    Err(Error::Startup {
        attempts,
        reason: last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use rand::Rng;

    use crate::adapter::outbound::memory::MemoryStore;
    use crate::domain::bet::Bet;
    use crate::domain::fixture::{Match, MatchStatus, NewMatch};
    use crate::domain::id::{BetId, BettorId, MatchId, PersonalityId};
    use crate::domain::pool::Pool;
    use crate::port::outbound::store::{BetStore, MatchStore};

    /// Delegates to a memory store but fails the first `failures` pings.
    struct FlakyStore {
        inner: MemoryStore,
        failures: u32,
        pings: AtomicU32,
    }

    impl FlakyStore {
        fn new(failures: u32) -> Self {
            Self {
                inner: MemoryStore::new(),
                failures,
                pings: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl MatchStore for FlakyStore {
        async fn insert_match(&self, new: NewMatch) -> Result<Match> {
            self.inner.insert_match(new).await
        }
        async fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
            self.inner.get_match(id).await
        }
        async fn update_match(&self, updated: &Match) -> Result<()> {
            self.inner.update_match(updated).await
        }
        async fn matches_by_status(&self, status: MatchStatus) -> Result<Vec<Match>> {
            self.inner.matches_by_status(status).await
        }
        async fn matches_by_personality(&self, personality: PersonalityId) -> Result<Vec<Match>> {
            self.inner.matches_by_personality(personality).await
        }
    }

    #[async_trait]
    impl BetStore for FlakyStore {
        async fn get_bet(&self, id: &BetId) -> Result<Option<Bet>> {
            self.inner.get_bet(id).await
        }
        async fn update_bet(&self, updated: &Bet) -> Result<()> {
            self.inner.update_bet(updated).await
        }
        async fn bets_by_match(&self, match_id: MatchId) -> Result<Vec<Bet>> {
            self.inner.bets_by_match(match_id).await
        }
        async fn bets_by_bettor(&self, bettor: &BettorId) -> Result<Vec<Bet>> {
            self.inner.bets_by_bettor(bettor).await
        }
        async fn pool_totals(&self, match_id: MatchId) -> Result<Pool> {
            self.inner.pool_totals(match_id).await
        }
    }

    #[async_trait]
    impl ArenaStore for FlakyStore {
        async fn commit_bet(&self, updated: &Match, bet: &Bet) -> Result<()> {
            self.inner.commit_bet(updated, bet).await
        }
        async fn commit_settlement(&self, completed: &Match, bets: &[Bet]) -> Result<()> {
            self.inner.commit_settlement(completed, bets).await
        }
        async fn ping(&self) -> Result<()> {
            let n = self.pings.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(Error::Store("warming up".into()));
            }
            Ok(())
        }
    }

    fn quick(max_attempts: u32) -> StartupConfig {
        StartupConfig {
            max_attempts,
            retry_delay_ms: 1,
        }
    }

    #[tokio::test]
    async fn ready_after_retries() {
        let store = FlakyStore::new(2);
        wait_until_ready(&store, &quick(5)).await.unwrap();
        assert_eq!(store.pings.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let store = FlakyStore::new(10);
        let err = wait_until_ready(&store, &quick(3)).await.unwrap_err();
        assert!(matches!(err, Error::Startup { attempts: 3, .. }));
        assert_eq!(store.pings.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a: u64 = rng_from_seed(Some(7)).gen();
        let b: u64 = rng_from_seed(Some(7)).gen();
        assert_eq!(a, b);
    }

    #[test]
    fn status_notifier_registered_only_when_enabled() {
        assert_eq!(build_notifier_registry(None).len(), 1);

        let config = Config {
            status_file: Some("/tmp/knightwatch-status.json".into()),
            ..Config::default()
        };
        let arena = Arena::build(&config, Arc::new(MemoryStore::new()));
        assert!(arena.status.is_some());
        assert_eq!(arena.ctx.notifiers.len(), 2);
    }
}
