//! A wired arena for integration tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::adapter::outbound::chess::ShakmatyRules;
use crate::adapter::outbound::memory::MemoryStore;
use crate::application::betting::{BettingService, BettingSettings};
use crate::application::context::ArenaContext;
use crate::application::lifecycle::{LifecycleManager, LifecycleSettings};
use crate::application::matchmaking::{Matchmaker, MatchmakingSettings};
use crate::domain::personality::PersonalityRegistry;
use crate::port::outbound::notifier::{ArenaEvent, Notifier, NotifierRegistry};

use super::config;

/// Notifier that keeps every event it sees.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<ArenaEvent>>>,
}

impl EventRecorder {
    pub fn events(&self) -> Vec<ArenaEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&ArenaEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }
}

impl Notifier for EventRecorder {
    fn notify(&self, event: ArenaEvent) {
        self.events.lock().push(event);
    }
}

/// Every service on one in-memory store, with instant pacing.
pub struct TestArena {
    pub store: Arc<MemoryStore>,
    pub ctx: ArenaContext,
    pub lifecycle: Arc<LifecycleManager<ShakmatyRules>>,
    pub matchmaker: Matchmaker,
    pub betting: BettingService,
    pub events: EventRecorder,
}

/// Builder for [`TestArena`].
pub struct TestArenaBuilder {
    registry: PersonalityRegistry,
    lifecycle: LifecycleSettings,
    matchmaking: MatchmakingSettings,
    betting: BettingSettings,
    seed: u64,
}

impl Default for TestArenaBuilder {
    fn default() -> Self {
        Self {
            registry: PersonalityRegistry::builtin(),
            lifecycle: config::lifecycle(100),
            matchmaking: config::matchmaking(2, 5),
            betting: config::betting(),
            seed: 7,
        }
    }
}

impl TestArenaBuilder {
    pub fn registry(mut self, registry: PersonalityRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn move_ceiling(mut self, ceiling: usize) -> Self {
        self.lifecycle.move_ceiling = ceiling;
        self
    }

    pub fn matchmaking(mut self, settings: MatchmakingSettings) -> Self {
        self.matchmaking = settings;
        self
    }

    pub fn betting(mut self, settings: BettingSettings) -> Self {
        self.betting = settings;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> TestArena {
        let store = Arc::new(MemoryStore::new());
        let events = EventRecorder::default();
        let mut notifiers = NotifierRegistry::new();
        notifiers.register(Box::new(events.clone()));

        let ctx = ArenaContext::new(store.clone(), Arc::new(self.registry), Arc::new(notifiers));
        let lifecycle = Arc::new(LifecycleManager::new(
            ctx.clone(),
            Arc::new(ShakmatyRules::new()),
            self.lifecycle,
            config::seeded_rng(self.seed),
        ));
        let matchmaker = Matchmaker::new(
            ctx.clone(),
            self.matchmaking,
            config::seeded_rng(self.seed.wrapping_add(1)),
        );
        let betting = BettingService::new(ctx.clone(), self.betting);

        TestArena {
            store,
            ctx,
            lifecycle,
            matchmaker,
            betting,
            events,
        }
    }
}

impl TestArena {
    pub fn builder() -> TestArenaBuilder {
        TestArenaBuilder::default()
    }
}
