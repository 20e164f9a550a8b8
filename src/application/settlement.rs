//! Pooled-odds bet settlement.
//!
//! Winners share the whole pool in proportion to their stake, minus the
//! platform fee. Settlement only ever touches `Active` bets, so running it
//! twice on the same match changes nothing.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::bet::{Bet, BetStatus};
use crate::domain::error::DomainError;
use crate::domain::id::BetId;
use crate::domain::outcome::Outcome;
use crate::domain::pool::Pool;

/// Decimal places kept on payouts.
pub const PAYOUT_SCALE: u32 = 8;

/// Settlement decision for one bet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetSettlement {
    pub bet_id: BetId,
    pub status: BetStatus,
    /// Set iff `status == Won`.
    pub payout: Option<Decimal>,
}

/// Totals of one settlement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettlementSummary {
    pub winners: usize,
    pub losers: usize,
    pub total_pool: Decimal,
    pub paid_out: Decimal,
    /// Fee plus whatever the winners could not claim.
    pub retained: Decimal,
}

/// Payout for a winning stake of `amount`.
///
/// Returns `None` when nobody backed the winning outcome.
#[must_use]
pub fn payout(amount: Decimal, pool: &Pool, result: Outcome, fee: Decimal) -> Option<Decimal> {
    let winning_pool = pool.get(result);
    if winning_pool.is_zero() {
        return None;
    }
    let gross = amount * pool.total() * (Decimal::ONE - fee) / winning_pool;
    Some(gross.round_dp_with_strategy(PAYOUT_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

/// Decide the fate of every active bet for a match that ended in `result`.
///
/// With a zero winning pool every active bet loses and the house keeps the
/// pool.
#[must_use]
pub fn settle(pool: &Pool, result: Outcome, bets: &[Bet], fee: Decimal) -> Vec<BetSettlement> {
    let nobody_won = pool.get(result).is_zero();

    bets.iter()
        .filter(|bet| bet.is_active())
        .map(|bet| {
            let won = !nobody_won && bet.outcome() == result;
            let payout = if won {
                payout(bet.amount(), pool, result, fee)
            } else {
                None
            };
            match payout {
                Some(p) => BetSettlement {
                    bet_id: bet.id().clone(),
                    status: BetStatus::Won,
                    payout: Some(p),
                },
                None => BetSettlement {
                    bet_id: bet.id().clone(),
                    status: BetStatus::Lost,
                    payout: None,
                },
            }
        })
        .collect()
}

/// Apply settlement decisions to `bets` in place.
///
/// Bets without a decision are left untouched. Returns the bets that
/// changed.
///
/// # Errors
///
/// Fails if a decision targets a bet that is no longer active.
pub fn apply(bets: &mut [Bet], decisions: &[BetSettlement]) -> Result<Vec<Bet>, DomainError> {
    let mut changed = Vec::with_capacity(decisions.len());
    for decision in decisions {
        let Some(bet) = bets.iter_mut().find(|b| b.id() == &decision.bet_id) else {
            continue;
        };
        match (decision.status, decision.payout) {
            (BetStatus::Won, Some(p)) => bet.mark_won(p)?,
            _ => bet.mark_lost()?,
        }
        changed.push(bet.clone());
    }
    Ok(changed)
}

/// Summarize a settlement run against the match pool.
#[must_use]
pub fn summarize(pool: &Pool, decisions: &[BetSettlement]) -> SettlementSummary {
    let winners = decisions
        .iter()
        .filter(|d| d.status == BetStatus::Won)
        .count();
    let paid_out: Decimal = decisions.iter().filter_map(|d| d.payout).sum();
    let total_pool = pool.total();
    SettlementSummary {
        winners,
        losers: decisions.len() - winners,
        total_pool,
        paid_out,
        retained: total_pool - paid_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::{BettorId, MatchId};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    const FEE: Decimal = dec!(0.05);

    fn bet(outcome: Outcome, amount: Decimal) -> Bet {
        Bet::new(
            MatchId::new(1),
            BettorId::new("0xbettor"),
            outcome,
            amount,
            Utc::now(),
        )
        .unwrap()
    }

    fn pool(white: Decimal, black: Decimal, draw: Decimal) -> Pool {
        Pool { white, black, draw }
    }

    #[test]
    fn worked_example_pays_6_46() {
        let pool = pool(dec!(10), dec!(5), dec!(2));
        let winner = bet(Outcome::White, dec!(4));
        let loser = bet(Outcome::Black, dec!(5));

        let decisions = settle(&pool, Outcome::White, &[winner.clone(), loser.clone()], FEE);

        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].bet_id, *winner.id());
        assert_eq!(decisions[0].status, BetStatus::Won);
        assert_eq!(decisions[0].payout, Some(dec!(6.46)));
        assert_eq!(decisions[1].status, BetStatus::Lost);
        assert_eq!(decisions[1].payout, None);
    }

    #[test]
    fn winners_share_pool_minus_fee() {
        let bets = vec![
            bet(Outcome::Draw, dec!(3)),
            bet(Outcome::Draw, dec!(1)),
            bet(Outcome::White, dec!(6)),
        ];
        let pool = pool(dec!(6), dec!(0), dec!(4));

        let decisions = settle(&pool, Outcome::Draw, &bets, FEE);
        let summary = summarize(&pool, &decisions);

        assert_eq!(decisions[0].payout, Some(dec!(7.125)));
        assert_eq!(decisions[1].payout, Some(dec!(2.375)));
        assert_eq!(summary.winners, 2);
        assert_eq!(summary.losers, 1);
        assert_eq!(summary.paid_out, dec!(9.5));
        assert_eq!(summary.retained, dec!(0.5));
    }

    #[test]
    fn zero_winning_pool_pays_nobody() {
        let bets = vec![bet(Outcome::White, dec!(2)), bet(Outcome::Black, dec!(3))];
        let pool = pool(dec!(2), dec!(3), dec!(0));

        let decisions = settle(&pool, Outcome::Draw, &bets, FEE);
        let summary = summarize(&pool, &decisions);

        assert!(decisions.iter().all(|d| d.status == BetStatus::Lost));
        assert!(decisions.iter().all(|d| d.payout.is_none()));
        assert_eq!(summary.paid_out, Decimal::ZERO);
        assert_eq!(summary.retained, dec!(5));
    }

    #[test]
    fn payouts_are_rounded_to_eight_places() {
        let pool = pool(dec!(1), dec!(2), dec!(0));
        let p = payout(dec!(1), &pool, Outcome::Black, FEE).unwrap();
        // 1 * 3 * 0.95 / 2
        assert_eq!(p, dec!(1.425));

        let pool = Pool {
            white: dec!(3),
            black: dec!(1),
            draw: dec!(0),
        };
        let p = payout(dec!(1), &pool, Outcome::White, FEE).unwrap();
        assert_eq!(p, dec!(1.26666667));
    }

    #[test]
    fn settlement_is_idempotent() {
        let pool = pool(dec!(10), dec!(5), dec!(2));
        let mut bets = vec![bet(Outcome::White, dec!(4)), bet(Outcome::Black, dec!(5))];

        let first = settle(&pool, Outcome::White, &bets, FEE);
        apply(&mut bets, &first).unwrap();
        let snapshot = bets.clone();

        let second = settle(&pool, Outcome::White, &bets, FEE);
        assert!(second.is_empty());
        let changed = apply(&mut bets, &second).unwrap();
        assert!(changed.is_empty());
        assert_eq!(bets, snapshot);
    }

    #[test]
    fn apply_rejects_settled_bet() {
        let mut bets = vec![bet(Outcome::White, dec!(1))];
        let decision = BetSettlement {
            bet_id: bets[0].id().clone(),
            status: BetStatus::Lost,
            payout: None,
        };
        apply(&mut bets, std::slice::from_ref(&decision)).unwrap();
        assert!(matches!(
            apply(&mut bets, &[decision]),
            Err(DomainError::AlreadySettled { .. })
        ));
    }

    #[test]
    fn already_settled_bets_are_skipped() {
        let pool = pool(dec!(4), dec!(0), dec!(0));
        let mut settled = bet(Outcome::White, dec!(4));
        settled.mark_lost().unwrap();

        let decisions = settle(&pool, Outcome::White, &[settled], FEE);
        assert!(decisions.is_empty());
    }
}
