//! Builders for domain primitives used across tests.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::bet::Bet;
use crate::domain::fixture::{Match, MatchType, NewMatch};
use crate::domain::id::{BettorId, MatchId, PersonalityId};
use crate::domain::outcome::Outcome;
use crate::domain::personality::{Personality, SearchBudget, StyleTag};

/// Personality with a default budget and no openings.
pub fn personality(id: u32, rating: u32, style: StyleTag) -> Personality {
    Personality {
        id: PersonalityId::new(id),
        name: format!("P{id}"),
        rating,
        style,
        openings: Vec::new(),
        budget: SearchBudget::default(),
    }
}

/// A match scheduled `minutes` from `now`.
pub fn scheduled_match(id: u64, white: u32, black: u32, now: DateTime<Utc>, minutes: i64) -> Match {
    Match::from_new(
        MatchId::new(id),
        NewMatch::scheduled(
            PersonalityId::new(white),
            PersonalityId::new(black),
            MatchType::Regular,
            "5+0",
            now + Duration::minutes(minutes),
        ),
    )
}

/// Matching [`NewMatch`] for store inserts.
pub fn new_scheduled(white: u32, black: u32, start: DateTime<Utc>) -> NewMatch {
    NewMatch::scheduled(
        PersonalityId::new(white),
        PersonalityId::new(black),
        MatchType::Regular,
        "5+0",
        start,
    )
}

/// An in-progress match insert starting at `now`.
pub fn new_immediate(white: u32, black: u32, now: DateTime<Utc>) -> NewMatch {
    NewMatch::immediate(
        PersonalityId::new(white),
        PersonalityId::new(black),
        MatchType::Regular,
        "5+0",
        now,
    )
}

/// An active bet; panics on an invalid stake.
pub fn bet(match_id: MatchId, bettor: &str, outcome: Outcome, amount: Decimal) -> Bet {
    Bet::new(match_id, BettorId::new(bettor), outcome, amount, Utc::now())
        .expect("test stake must be positive")
}
