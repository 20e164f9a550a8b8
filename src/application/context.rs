//! Collaborators shared by the arena services.

use std::sync::Arc;

use crate::application::locks::MatchLocks;
use crate::domain::personality::PersonalityRegistry;
use crate::port::outbound::notifier::{ArenaEvent, NotifierRegistry};
use crate::port::outbound::store::ArenaStore;

/// Handles every service needs: storage, the roster, per-match locks and
/// event sinks.
#[derive(Clone)]
pub struct ArenaContext {
    pub store: Arc<dyn ArenaStore>,
    pub registry: Arc<PersonalityRegistry>,
    pub locks: Arc<MatchLocks>,
    pub notifiers: Arc<NotifierRegistry>,
}

impl ArenaContext {
    #[must_use]
    pub fn new(
        store: Arc<dyn ArenaStore>,
        registry: Arc<PersonalityRegistry>,
        notifiers: Arc<NotifierRegistry>,
    ) -> Self {
        Self {
            store,
            registry,
            locks: Arc::new(MatchLocks::new()),
            notifiers,
        }
    }

    /// Broadcast an event to every registered notifier.
    pub fn emit(&self, event: ArenaEvent) {
        self.notifiers.notify_all(event);
    }
}
