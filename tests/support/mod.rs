#![allow(dead_code)]

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use knightwatch::domain::bet::{Bet, BetStatus};
use knightwatch::domain::id::MatchId;
use knightwatch::port::outbound::store::MatchStore;
use knightwatch::testkit::arena::TestArena;
use knightwatch::testkit::domain::new_scheduled;

/// Insert a match between `white` and `black` starting in an hour.
pub async fn upcoming(arena: &TestArena, white: u32, black: u32) -> MatchId {
    arena
        .store
        .insert_match(new_scheduled(white, black, Utc::now() + Duration::hours(1)))
        .await
        .expect("insert match")
        .id()
}

/// Sum of payouts over settled winning bets.
pub fn paid_out(bets: &[Bet]) -> Decimal {
    bets.iter()
        .filter(|b| b.status() == BetStatus::Won)
        .filter_map(Bet::payout)
        .sum()
}
