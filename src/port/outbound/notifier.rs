//! Notifier port for arena event notifications.
//!
//! This module defines the trait for broadcasting arena events such as
//! match transitions, committed moves, placed bets and settlements.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::bet::Bet;
use crate::domain::fixture::{Match, MatchType};
use crate::domain::id::{BetId, MatchId, PersonalityId};
use crate::domain::outcome::Outcome;
use crate::domain::rules::CompletionReason;

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum ArenaEvent {
    /// A future match was scheduled.
    MatchCreated(MatchEvent),
    /// A match started playing (immediately or on promotion).
    MatchStarted(MatchEvent),
    /// A move was appended to a match.
    MoveCommitted(MoveEvent),
    /// A match reached a result.
    MatchCompleted(CompletionEvent),
    /// A spectator placed a bet.
    BetPlaced(BetEvent),
    /// Bets of a completed match were settled.
    BetsSettled(SettlementEvent),
}

/// Match creation or start event.
#[derive(Debug, Clone)]
pub struct MatchEvent {
    pub match_id: MatchId,
    pub white: PersonalityId,
    pub black: PersonalityId,
    pub match_type: MatchType,
    pub start_time: DateTime<Utc>,
}

impl From<&Match> for MatchEvent {
    fn from(m: &Match) -> Self {
        Self {
            match_id: m.id(),
            white: m.white(),
            black: m.black(),
            match_type: m.match_type(),
            start_time: m.start_time(),
        }
    }
}

/// Committed move event.
#[derive(Debug, Clone)]
pub struct MoveEvent {
    pub match_id: MatchId,
    /// One-based ply number of the committed move.
    pub ply: usize,
    pub san: String,
    /// True when the planned move was illegal and a random one was played.
    pub fallback: bool,
}

/// Match completion event.
#[derive(Debug, Clone)]
pub struct CompletionEvent {
    pub match_id: MatchId,
    pub result: Outcome,
    pub reason: CompletionReason,
    pub plies: usize,
}

/// Bet placement event.
#[derive(Debug, Clone)]
pub struct BetEvent {
    pub match_id: MatchId,
    pub bet_id: BetId,
    pub outcome: Outcome,
    pub amount: Decimal,
}

impl From<&Bet> for BetEvent {
    fn from(bet: &Bet) -> Self {
        Self {
            match_id: bet.match_id(),
            bet_id: bet.id().clone(),
            outcome: bet.outcome(),
            amount: bet.amount(),
        }
    }
}

/// Settlement totals for one match.
#[derive(Debug, Clone)]
pub struct SettlementEvent {
    pub match_id: MatchId,
    pub result: Outcome,
    pub winners: usize,
    pub losers: usize,
    pub total_pool: Decimal,
    pub paid_out: Decimal,
    /// Fee plus any pool nobody could win.
    pub retained: Decimal,
}

/// Trait for notification handlers.
///
/// Implementations must be thread-safe and return quickly; slow work
/// should be spawned.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: ArenaEvent);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: ArenaEvent) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: ArenaEvent) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: ArenaEvent) {
        use tracing::{debug, info};
        match event {
            ArenaEvent::MatchCreated(e) => {
                info!(
                    match_id = %e.match_id,
                    white = %e.white,
                    black = %e.black,
                    match_type = %e.match_type,
                    start_time = %e.start_time,
                    "Match scheduled"
                );
            }
            ArenaEvent::MatchStarted(e) => {
                info!(
                    match_id = %e.match_id,
                    white = %e.white,
                    black = %e.black,
                    "Match started"
                );
            }
            ArenaEvent::MoveCommitted(e) => {
                debug!(
                    match_id = %e.match_id,
                    ply = e.ply,
                    san = %e.san,
                    fallback = e.fallback,
                    "Move committed"
                );
            }
            ArenaEvent::MatchCompleted(e) => {
                info!(
                    match_id = %e.match_id,
                    result = %e.result,
                    reason = %e.reason,
                    plies = e.plies,
                    "Match completed"
                );
            }
            ArenaEvent::BetPlaced(e) => {
                info!(
                    match_id = %e.match_id,
                    bet_id = %e.bet_id,
                    outcome = %e.outcome,
                    amount = %e.amount,
                    "Bet placed"
                );
            }
            ArenaEvent::BetsSettled(e) => {
                info!(
                    match_id = %e.match_id,
                    result = %e.result,
                    winners = e.winners,
                    losers = e.losers,
                    total_pool = %e.total_pool,
                    paid_out = %e.paid_out,
                    retained = %e.retained,
                    "Bets settled"
                );
            }
        }
    }
}
