//! Match lifecycle manager.
//!
//! Drives matches `Scheduled -> InProgress -> Completed` without human
//! input. Each tick promotes due matches and plans one move per live match;
//! planned moves are committed later (after a thinking pause) through
//! [`LifecycleManager::commit`], so a slow match never stalls the others.
//!
//! Failure handling per match:
//! - corrupt history is logged and replay restarts from the initial position
//! - an illegal planned move is replaced by a random legal move
//! - no legal move on a non-terminal position forces a draw
//! - any other error is logged with the match id and counted, never
//!   propagated to the rest of the tick

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashSet;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::application::context::ArenaContext;
use crate::application::pacing::{PacingSettings, ThinkingTime};
use crate::application::selector;
use crate::application::settlement::{self, SettlementSummary};
use crate::domain::error::DomainError;
use crate::domain::fixture::{Match, MatchStatus};
use crate::domain::id::MatchId;
use crate::domain::outcome::Outcome;
use crate::domain::rules::CompletionReason;
use crate::error::{Error, Result};
use crate::port::outbound::notifier::{
    ArenaEvent, CompletionEvent, MatchEvent, MoveEvent, SettlementEvent,
};
use crate::port::outbound::rules::RulesEngine;

/// Lifecycle tuning.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleSettings {
    /// Plies after which a live match is forced to a draw.
    pub move_ceiling: usize,
    /// Fraction of the pool kept by the platform on settlement.
    pub platform_fee: Decimal,
    pub pacing: PacingSettings,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            move_ceiling: 100,
            platform_fee: Decimal::new(5, 2),
            pacing: PacingSettings::default(),
        }
    }
}

/// A move chosen for a match, waiting for its thinking pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub match_id: MatchId,
    /// Plies already played when the move was planned.
    pub ply: usize,
    pub san: String,
    pub delay: Duration,
}

/// Result of [`LifecycleManager::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// A move is ready to be committed after its delay.
    Planned(PlannedMove),
    /// The match ended without a new move.
    Completed {
        result: Outcome,
        reason: CompletionReason,
    },
    /// A previously planned move has not been committed yet.
    Pending,
    /// The match is not in progress.
    Idle,
}

/// Result of [`LifecycleManager::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    Applied {
        san: String,
        /// True when the planned move was illegal and a random one was played.
        fallback: bool,
        completion: Option<(Outcome, CompletionReason)>,
    },
    /// No legal move existed at commit time; the match was drawn.
    Ended {
        result: Outcome,
        reason: CompletionReason,
    },
    /// The match changed since planning; nothing was written.
    Stale,
}

/// Outcome of one lifecycle tick.
#[derive(Debug, Default)]
pub struct TickReport {
    pub promoted: usize,
    pub planned: Vec<PlannedMove>,
    pub completed: usize,
    pub failed: usize,
}

/// Autonomous match driver.
pub struct LifecycleManager<R: RulesEngine> {
    ctx: ArenaContext,
    rules: Arc<R>,
    settings: LifecycleSettings,
    pacing: ThinkingTime,
    rng: Mutex<StdRng>,
    /// Matches with a planned move awaiting commit.
    pending: DashSet<MatchId>,
}

impl<R: RulesEngine> LifecycleManager<R> {
    pub fn new(ctx: ArenaContext, rules: Arc<R>, settings: LifecycleSettings, rng: StdRng) -> Self {
        Self {
            ctx,
            rules,
            pacing: ThinkingTime::new(settings.pacing),
            settings,
            rng: Mutex::new(rng),
            pending: DashSet::new(),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }

    /// Number of matches with an uncommitted planned move.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Run one scheduler tick at `now`.
    ///
    /// Errors are isolated per match; only a failure to list matches aborts
    /// the tick.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<TickReport> {
        let mut report = TickReport::default();

        let (promoted, promote_failures) = self.promote_due(now).await?;
        report.promoted = promoted;
        report.failed += promote_failures;

        let live = self.ctx.store.matches_by_status(MatchStatus::InProgress).await?;
        for m in live {
            match self.advance(m.id(), now).await {
                Ok(Advance::Planned(planned)) => report.planned.push(planned),
                Ok(Advance::Completed { .. }) => report.completed += 1,
                Ok(Advance::Pending | Advance::Idle) => {}
                Err(e) => {
                    error!(match_id = %m.id(), error = %e, "Failed to advance match");
                    report.failed += 1;
                }
            }
        }

        debug!(
            promoted = report.promoted,
            planned = report.planned.len(),
            completed = report.completed,
            failed = report.failed,
            "Lifecycle tick finished"
        );
        Ok(report)
    }

    /// Start every scheduled match whose start time has passed.
    ///
    /// Returns the number of matches started and the number that failed.
    pub async fn promote_due(&self, now: DateTime<Utc>) -> Result<(usize, usize)> {
        let scheduled = self.ctx.store.matches_by_status(MatchStatus::Scheduled).await?;
        let mut started = 0;
        let mut failed = 0;

        for m in scheduled.iter().filter(|m| m.is_due(now)) {
            match self.start_match(m.id(), Some(now)).await {
                Ok(true) => started += 1,
                Ok(false) => {}
                Err(e) => {
                    error!(match_id = %m.id(), error = %e, "Failed to start match");
                    failed += 1;
                }
            }
        }
        Ok((started, failed))
    }

    /// Move a scheduled match to in-progress, closing its betting.
    ///
    /// With `due_at` set, the match only starts if it is due at that time.
    /// Returns false when nothing changed.
    pub async fn start_match(&self, id: MatchId, due_at: Option<DateTime<Utc>>) -> Result<bool> {
        let _guard = self.ctx.locks.acquire(id).await;
        let mut m = self.load(id).await?;

        let due = due_at.map_or(true, |now| m.is_due(now));
        if m.status() != MatchStatus::Scheduled || !due {
            return Ok(false);
        }

        m.start()?;
        self.ctx.store.update_match(&m).await?;
        info!(match_id = %id, white = %m.white(), black = %m.black(), "Match promoted");
        self.ctx.emit(ArenaEvent::MatchStarted(MatchEvent::from(&m)));
        Ok(true)
    }

    /// Plan the next move of a live match, or complete it if it is over.
    pub async fn advance(&self, id: MatchId, now: DateTime<Utc>) -> Result<Advance> {
        if self.pending.contains(&id) {
            return Ok(Advance::Pending);
        }

        let guard = self.ctx.locks.acquire(id).await;
        let result = self.advance_locked(id, now).await;
        drop(guard);
        if matches!(result, Ok(Advance::Completed { .. })) {
            self.ctx.locks.prune(id);
        }
        result
    }

    async fn advance_locked(&self, id: MatchId, now: DateTime<Utc>) -> Result<Advance> {
        let m = self.load(id).await?;
        if m.status() != MatchStatus::InProgress {
            return Ok(Advance::Idle);
        }

        let position = self.position_of(&m);

        if let Some(termination) = self.rules.termination(&position) {
            let result = termination.outcome();
            let reason = CompletionReason::from(termination);
            self.finish(m, result, reason, now).await?;
            return Ok(Advance::Completed { result, reason });
        }

        if m.ply_count() >= self.settings.move_ceiling {
            self.finish(m, Outcome::Draw, CompletionReason::MoveCeiling, now)
                .await?;
            return Ok(Advance::Completed {
                result: Outcome::Draw,
                reason: CompletionReason::MoveCeiling,
            });
        }

        let side = self.rules.side_to_move(&position);
        let player = m.player(side);
        let personality = self
            .ctx
            .registry
            .get(player)
            .ok_or(Error::UnknownPersonality(player))?;

        let candidates = self.rules.legal_moves(&position);
        let in_check = self.rules.is_check(&position);

        let (san, delay) = {
            let mut rng = self.rng.lock();
            let san = selector::select_move(&candidates, personality.style, &mut *rng);
            let delay =
                self.pacing
                    .delay(in_check, candidates.len(), &personality.budget, &mut *rng);
            (san, delay)
        };

        let Some(san) = san else {
            warn!(match_id = %id, ply = m.ply_count(), "No legal move on a live position");
            self.finish(m, Outcome::Draw, CompletionReason::NoLegalMoves, now)
                .await?;
            return Ok(Advance::Completed {
                result: Outcome::Draw,
                reason: CompletionReason::NoLegalMoves,
            });
        };

        debug!(
            match_id = %id,
            ply = m.ply_count(),
            san = %san,
            style = %personality.style,
            delay_ms = delay.as_millis() as u64,
            "Move planned"
        );
        self.pending.insert(id);
        Ok(Advance::Planned(PlannedMove {
            match_id: id,
            ply: m.ply_count(),
            san,
            delay,
        }))
    }

    /// Apply a planned move, re-validating it against the current position.
    pub async fn commit(&self, planned: PlannedMove, now: DateTime<Utc>) -> Result<Commit> {
        let id = planned.match_id;
        let guard = self.ctx.locks.acquire(id).await;
        let result = self.commit_locked(planned, now).await;
        self.pending.remove(&id);
        drop(guard);
        if matches!(
            result,
            Ok(Commit::Ended { .. } | Commit::Applied { completion: Some(_), .. })
        ) {
            self.ctx.locks.prune(id);
        }
        result
    }

    /// Forget a planned move that will never be committed.
    pub fn release(&self, id: MatchId) {
        self.pending.remove(&id);
    }

    /// Play a match to the end with no pauses.
    ///
    /// A scheduled match is started first regardless of its start time.
    pub async fn run_to_completion(&self, id: MatchId) -> Result<Match> {
        self.pending.remove(&id);
        self.start_match(id, None).await?;

        loop {
            match self.advance(id, Utc::now()).await? {
                Advance::Planned(planned) => {
                    self.commit(planned, Utc::now()).await?;
                }
                Advance::Completed { .. } | Advance::Idle | Advance::Pending => {
                    let m = self.load(id).await?;
                    if m.status() == MatchStatus::Completed {
                        return Ok(m);
                    }
                    return Err(Error::Domain(DomainError::MatchNotInProgress {
                        match_id: id,
                        status: m.status(),
                    }));
                }
            }
        }
    }

    async fn commit_locked(&self, planned: PlannedMove, now: DateTime<Utc>) -> Result<Commit> {
        let id = planned.match_id;
        let mut m = self.load(id).await?;
        if m.status() != MatchStatus::InProgress || m.ply_count() != planned.ply {
            debug!(match_id = %id, planned_ply = planned.ply, ply = m.ply_count(), "Dropping stale move");
            return Ok(Commit::Stale);
        }

        let position = self.position_of(&m);
        let (next, san, fallback) = match self.rules.apply_move(&position, &planned.san) {
            Ok(next) => (next, planned.san, false),
            Err(e) => {
                warn!(match_id = %id, san = %planned.san, error = %e, "Planned move rejected, playing a random legal move");
                let candidates = self.rules.legal_moves(&position);
                let choice = {
                    let mut rng = self.rng.lock();
                    candidates.choose(&mut *rng).map(|c| c.san.clone())
                };
                let Some(san) = choice else {
                    self.finish(m, Outcome::Draw, CompletionReason::NoLegalMoves, now)
                        .await?;
                    return Ok(Commit::Ended {
                        result: Outcome::Draw,
                        reason: CompletionReason::NoLegalMoves,
                    });
                };
                let next = self.rules.apply_move(&position, &san)?;
                (next, san, true)
            }
        };

        m.push_move(san.clone())?;
        let ply = m.ply_count();
        self.ctx.emit(ArenaEvent::MoveCommitted(MoveEvent {
            match_id: id,
            ply,
            san: san.clone(),
            fallback,
        }));

        let completion = match self.rules.termination(&next) {
            Some(termination) => Some((termination.outcome(), CompletionReason::from(termination))),
            None if ply >= self.settings.move_ceiling => {
                Some((Outcome::Draw, CompletionReason::MoveCeiling))
            }
            None => None,
        };

        match completion {
            Some((result, reason)) => {
                self.finish(m, result, reason, now).await?;
            }
            None => self.ctx.store.update_match(&m).await?,
        }

        Ok(Commit::Applied {
            san,
            fallback,
            completion,
        })
    }

    /// Complete a match and settle its bets in one store commit.
    async fn finish(
        &self,
        mut m: Match,
        result: Outcome,
        reason: CompletionReason,
        now: DateTime<Utc>,
    ) -> Result<SettlementSummary> {
        let id = m.id();
        m.complete(result, now)?;

        let mut bets = self.ctx.store.bets_by_match(id).await?;
        let pool = *m.pool();
        let decisions = settlement::settle(&pool, result, &bets, self.settings.platform_fee);
        let settled = settlement::apply(&mut bets, &decisions)?;
        self.ctx.store.commit_settlement(&m, &settled).await?;

        let summary = settlement::summarize(&pool, &decisions);
        info!(
            match_id = %id,
            result = %result,
            reason = %reason,
            plies = m.ply_count(),
            "Match completed"
        );
        self.ctx.emit(ArenaEvent::MatchCompleted(CompletionEvent {
            match_id: id,
            result,
            reason,
            plies: m.ply_count(),
        }));
        self.ctx.emit(ArenaEvent::BetsSettled(SettlementEvent {
            match_id: id,
            result,
            winners: summary.winners,
            losers: summary.losers,
            total_pool: summary.total_pool,
            paid_out: summary.paid_out,
            retained: summary.retained,
        }));
        Ok(summary)
    }

    /// Replay a match's history, falling back to the initial position.
    fn position_of(&self, m: &Match) -> R::Position {
        match self.rules.replay(m.moves()) {
            Ok(position) => position,
            Err(e) => {
                let err = Error::CorruptHistory {
                    ply: e.ply,
                    source: e.source,
                };
                warn!(match_id = %m.id(), error = %err, "Resetting to initial position");
                self.rules.initial_position()
            }
        }
    }

    async fn load(&self, id: MatchId) -> Result<Match> {
        self.ctx
            .store
            .get_match(id)
            .await?
            .ok_or(Error::MatchNotFound(id))
    }
}
