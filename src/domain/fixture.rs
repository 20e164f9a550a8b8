//! Matches between two personalities and their lifecycle transitions.
//!
//! A [`Match`] only ever moves forward through
//! `Scheduled -> InProgress -> Completed`. Every mutation goes through a
//! method that enforces the invariants:
//!
//! - `result` is set iff `status == Completed`
//! - `bets_locked` is true whenever `status != Scheduled`
//! - `moves` is append-only and only grows while in progress
//! - `pool` only grows while betting is open

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{MatchId, PersonalityId};
use super::outcome::{Outcome, Side};
use super::pool::Pool;

/// Lifecycle status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Cosmetic match category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Regular,
    Tournament,
    Showcase,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Tournament => write!(f, "tournament"),
            Self::Showcase => write!(f, "showcase"),
        }
    }
}

/// A match that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMatch {
    pub white: PersonalityId,
    pub black: PersonalityId,
    pub match_type: MatchType,
    pub time_control: String,
    pub start_time: DateTime<Utc>,
    pub status: MatchStatus,
}

impl NewMatch {
    /// A match that will start at `start_time`, open for betting until then.
    pub fn scheduled(
        white: PersonalityId,
        black: PersonalityId,
        match_type: MatchType,
        time_control: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            white,
            black,
            match_type,
            time_control: time_control.into(),
            start_time,
            status: MatchStatus::Scheduled,
        }
    }

    /// A match that starts playing right away.
    pub fn immediate(
        white: PersonalityId,
        black: PersonalityId,
        match_type: MatchType,
        time_control: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            white,
            black,
            match_type,
            time_control: time_control.into(),
            start_time: now,
            status: MatchStatus::InProgress,
        }
    }
}

/// A match between two personalities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    id: MatchId,
    white: PersonalityId,
    black: PersonalityId,
    status: MatchStatus,
    match_type: MatchType,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    result: Option<Outcome>,
    moves: Vec<String>,
    /// Advisory only; not enforced as a clock.
    time_control: String,
    bets_locked: bool,
    pool: Pool,
}

impl Match {
    /// Materialize a stored match from a [`NewMatch`] and its assigned id.
    #[must_use]
    pub fn from_new(id: MatchId, new: NewMatch) -> Self {
        Self {
            id,
            white: new.white,
            black: new.black,
            status: new.status,
            match_type: new.match_type,
            start_time: new.start_time,
            end_time: None,
            result: None,
            moves: Vec::new(),
            time_control: new.time_control,
            bets_locked: new.status != MatchStatus::Scheduled,
            pool: Pool::default(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> MatchId {
        self.id
    }

    #[must_use]
    pub const fn white(&self) -> PersonalityId {
        self.white
    }

    #[must_use]
    pub const fn black(&self) -> PersonalityId {
        self.black
    }

    /// The personality playing `side`.
    #[must_use]
    pub const fn player(&self, side: Side) -> PersonalityId {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    /// Check if `personality` plays in this match.
    #[must_use]
    pub fn involves(&self, personality: PersonalityId) -> bool {
        self.white == personality || self.black == personality
    }

    #[must_use]
    pub const fn status(&self) -> MatchStatus {
        self.status
    }

    #[must_use]
    pub const fn match_type(&self) -> MatchType {
        self.match_type
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    #[must_use]
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    #[must_use]
    pub const fn result(&self) -> Option<Outcome> {
        self.result
    }

    /// SAN moves played so far, in order.
    #[must_use]
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    /// Number of plies played.
    #[must_use]
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn time_control(&self) -> &str {
        &self.time_control
    }

    #[must_use]
    pub const fn bets_locked(&self) -> bool {
        self.bets_locked
    }

    #[must_use]
    pub const fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Check if a scheduled match should start at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == MatchStatus::Scheduled && self.start_time <= now
    }

    /// Scheduled -> InProgress. Betting closes in the same step.
    pub fn start(&mut self) -> Result<(), DomainError> {
        if self.status != MatchStatus::Scheduled {
            return Err(self.transition_error(MatchStatus::InProgress));
        }
        self.status = MatchStatus::InProgress;
        self.bets_locked = true;
        Ok(())
    }

    /// Append a move to the history.
    pub fn push_move(&mut self, san: impl Into<String>) -> Result<(), DomainError> {
        if self.status != MatchStatus::InProgress {
            return Err(DomainError::MatchNotInProgress {
                match_id: self.id,
                status: self.status,
            });
        }
        self.moves.push(san.into());
        Ok(())
    }

    /// InProgress -> Completed with a result.
    pub fn complete(&mut self, result: Outcome, at: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != MatchStatus::InProgress {
            return Err(self.transition_error(MatchStatus::Completed));
        }
        self.status = MatchStatus::Completed;
        self.result = Some(result);
        self.end_time = Some(at);
        self.bets_locked = true;
        Ok(())
    }

    /// Add stake to the pool for `outcome` while betting is open.
    pub fn record_stake(&mut self, outcome: Outcome, amount: Decimal) -> Result<(), DomainError> {
        if self.bets_locked || self.status != MatchStatus::Scheduled {
            return Err(DomainError::BetsLocked { match_id: self.id });
        }
        if amount <= Decimal::ZERO {
            return Err(DomainError::NonPositiveStake { amount });
        }
        self.pool.add(outcome, amount);
        Ok(())
    }

    fn transition_error(&self, to: MatchStatus) -> DomainError {
        DomainError::InvalidTransition {
            match_id: self.id,
            from: self.status,
            to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scheduled() -> Match {
        Match::from_new(
            MatchId::new(1),
            NewMatch::scheduled(
                PersonalityId::new(1),
                PersonalityId::new(2),
                MatchType::Regular,
                "5+0",
                Utc::now() + chrono::Duration::minutes(30),
            ),
        )
    }

    #[test]
    fn scheduled_match_is_open_for_betting() {
        let m = scheduled();
        assert_eq!(m.status(), MatchStatus::Scheduled);
        assert!(!m.bets_locked());
        assert!(m.result().is_none());
        assert_eq!(m.ply_count(), 0);
    }

    #[test]
    fn immediate_match_starts_locked() {
        let m = Match::from_new(
            MatchId::new(2),
            NewMatch::immediate(
                PersonalityId::new(1),
                PersonalityId::new(2),
                MatchType::Showcase,
                "3+2",
                Utc::now(),
            ),
        );
        assert_eq!(m.status(), MatchStatus::InProgress);
        assert!(m.bets_locked());
    }

    #[test]
    fn start_locks_betting() {
        let mut m = scheduled();
        m.start().unwrap();
        assert_eq!(m.status(), MatchStatus::InProgress);
        assert!(m.bets_locked());
    }

    #[test]
    fn status_never_regresses() {
        let mut m = scheduled();
        m.start().unwrap();
        assert!(matches!(
            m.start(),
            Err(DomainError::InvalidTransition { to: MatchStatus::InProgress, .. })
        ));

        m.complete(Outcome::Draw, Utc::now()).unwrap();
        assert!(m.start().is_err());
        assert!(m.complete(Outcome::White, Utc::now()).is_err());
        assert_eq!(m.result(), Some(Outcome::Draw));
    }

    #[test]
    fn cannot_complete_scheduled_match() {
        let mut m = scheduled();
        assert!(m.complete(Outcome::White, Utc::now()).is_err());
        assert!(m.result().is_none());
    }

    #[test]
    fn complete_sets_result_and_end_time() {
        let mut m = scheduled();
        m.start().unwrap();
        let at = Utc::now();
        m.complete(Outcome::Black, at).unwrap();
        assert_eq!(m.result(), Some(Outcome::Black));
        assert_eq!(m.end_time(), Some(at));
        assert!(m.bets_locked());
    }

    #[test]
    fn moves_only_append_while_in_progress() {
        let mut m = scheduled();
        assert!(m.push_move("e4").is_err());
        m.start().unwrap();
        m.push_move("e4").unwrap();
        m.push_move("e5").unwrap();
        assert_eq!(m.moves(), ["e4", "e5"]);

        m.complete(Outcome::Draw, Utc::now()).unwrap();
        assert!(matches!(
            m.push_move("Nf3"),
            Err(DomainError::MatchNotInProgress { .. })
        ));
        assert_eq!(m.ply_count(), 2);
    }

    #[test]
    fn stakes_accumulate_until_locked() {
        let mut m = scheduled();
        m.record_stake(Outcome::White, dec!(10)).unwrap();
        m.record_stake(Outcome::Draw, dec!(2)).unwrap();
        assert_eq!(m.pool().total(), dec!(12));

        m.start().unwrap();
        assert!(matches!(
            m.record_stake(Outcome::Black, dec!(5)),
            Err(DomainError::BetsLocked { .. })
        ));
        assert_eq!(m.pool().total(), dec!(12));
    }

    #[test]
    fn non_positive_stake_rejected() {
        let mut m = scheduled();
        assert!(matches!(
            m.record_stake(Outcome::White, dec!(0)),
            Err(DomainError::NonPositiveStake { .. })
        ));
        assert!(m.record_stake(Outcome::White, dec!(-1)).is_err());
        assert!(m.pool().is_empty());
    }

    #[test]
    fn is_due_only_for_scheduled_past_start() {
        let m = scheduled();
        assert!(!m.is_due(Utc::now()));
        assert!(m.is_due(Utc::now() + chrono::Duration::hours(1)));
    }

    #[test]
    fn player_maps_side() {
        let m = scheduled();
        assert_eq!(m.player(Side::White), PersonalityId::new(1));
        assert_eq!(m.player(Side::Black), PersonalityId::new(2));
        assert!(m.involves(PersonalityId::new(2)));
        assert!(!m.involves(PersonalityId::new(3)));
    }
}
