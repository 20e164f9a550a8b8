//! Style-biased move selection.
//!
//! Not a search: each personality filters the immediate legal moves by a
//! style predicate and usually picks from that subset.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::personality::StyleTag;
use crate::domain::rules::{CandidateMove, PieceKind};

/// Probability of choosing from the style-preferred subset when it is non-empty.
pub const PREFERRED_PROBABILITY: f64 = 0.7;

/// Check if `candidate` matches what `style` likes to play.
#[must_use]
pub fn is_preferred(style: StyleTag, candidate: &CandidateMove) -> bool {
    match style {
        StyleTag::Aggressive | StyleTag::Tactical => candidate.is_capture || candidate.gives_check,
        StyleTag::Defensive => !candidate.is_capture,
        StyleTag::Positional => {
            matches!(candidate.piece, PieceKind::Knight | PieceKind::Bishop) || candidate.is_castle
        }
        StyleTag::Classical | StyleTag::Neural | StyleTag::Mixed => true,
    }
}

/// Pick a move for a personality of the given `style`.
///
/// Returns `None` only when `candidates` is empty.
pub fn choose<'a, R: Rng + ?Sized>(
    candidates: &'a [CandidateMove],
    style: StyleTag,
    rng: &mut R,
) -> Option<&'a CandidateMove> {
    if candidates.is_empty() {
        return None;
    }

    let preferred: Vec<&CandidateMove> = candidates
        .iter()
        .filter(|c| is_preferred(style, c))
        .collect();

    if !preferred.is_empty() && rng.gen_bool(PREFERRED_PROBABILITY) {
        return preferred.choose(rng).copied();
    }
    candidates.choose(rng)
}

/// SAN of the chosen move, see [`choose`].
pub fn select_move<R: Rng + ?Sized>(
    candidates: &[CandidateMove],
    style: StyleTag,
    rng: &mut R,
) -> Option<String> {
    choose(candidates, style, rng).map(|c| c.san.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mv(san: &str, piece: PieceKind, capture: bool, check: bool, castle: bool) -> CandidateMove {
        CandidateMove {
            san: san.to_string(),
            piece,
            is_capture: capture,
            gives_check: check,
            is_castle: castle,
        }
    }

    /// Ten candidates, exactly one of which each biased style prefers
    /// (except Defensive, which prefers the nine quiet moves).
    fn mixed_position() -> Vec<CandidateMove> {
        let mut moves = vec![mv("Qxf7+", PieceKind::Queen, true, true, false)];
        for file in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            moves.push(mv(&format!("{file}3"), PieceKind::Pawn, false, false, false));
        }
        moves.push(mv("O-O", PieceKind::King, false, false, true));
        moves
    }

    fn preferred_rate(style: StyleTag, trials: usize) -> f64 {
        let moves = mixed_position();
        let mut rng = StdRng::seed_from_u64(7);
        let hits = (0..trials)
            .filter(|_| {
                let chosen = choose(&moves, style, &mut rng).unwrap();
                is_preferred(style, chosen)
            })
            .count();
        hits as f64 / trials as f64
    }

    #[test]
    fn empty_candidates_yield_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(choose(&[], StyleTag::Aggressive, &mut rng).is_none());
        assert!(select_move(&[], StyleTag::Classical, &mut rng).is_none());
    }

    #[test]
    fn chosen_move_is_always_a_candidate() {
        let moves = mixed_position();
        let mut rng = StdRng::seed_from_u64(99);
        for style in StyleTag::ALL {
            for _ in 0..200 {
                let san = select_move(&moves, style, &mut rng).unwrap();
                assert!(moves.iter().any(|m| m.san == san));
            }
        }
    }

    #[test]
    fn style_predicates() {
        let capture = mv("Bxe5", PieceKind::Bishop, true, false, false);
        let quiet_knight = mv("Nf3", PieceKind::Knight, false, false, false);
        let quiet_pawn = mv("a3", PieceKind::Pawn, false, false, false);
        let check = mv("Qh5+", PieceKind::Queen, false, true, false);
        let castle = mv("O-O", PieceKind::King, false, false, true);

        assert!(is_preferred(StyleTag::Aggressive, &capture));
        assert!(is_preferred(StyleTag::Tactical, &check));
        assert!(!is_preferred(StyleTag::Aggressive, &quiet_pawn));

        assert!(!is_preferred(StyleTag::Defensive, &capture));
        assert!(is_preferred(StyleTag::Defensive, &check));

        assert!(is_preferred(StyleTag::Positional, &quiet_knight));
        assert!(is_preferred(StyleTag::Positional, &capture));
        assert!(is_preferred(StyleTag::Positional, &castle));
        assert!(!is_preferred(StyleTag::Positional, &check));

        for style in [StyleTag::Classical, StyleTag::Neural, StyleTag::Mixed] {
            assert!(is_preferred(style, &quiet_pawn));
        }
    }

    #[test]
    fn aggressive_bias_converges() {
        // 0.7 from the preferred pick plus 0.3 * 1/10 from the uniform pick.
        let rate = preferred_rate(StyleTag::Aggressive, 20_000);
        assert!((rate - 0.73).abs() < 0.02, "rate = {rate}");
    }

    #[test]
    fn tactical_bias_converges() {
        let rate = preferred_rate(StyleTag::Tactical, 20_000);
        assert!((rate - 0.73).abs() < 0.02, "rate = {rate}");
    }

    #[test]
    fn positional_bias_converges() {
        // Only the castle qualifies.
        let rate = preferred_rate(StyleTag::Positional, 20_000);
        assert!((rate - 0.73).abs() < 0.02, "rate = {rate}");
    }

    #[test]
    fn defensive_bias_converges() {
        // 0.7 + 0.3 * 9/10.
        let rate = preferred_rate(StyleTag::Defensive, 20_000);
        assert!((rate - 0.97).abs() < 0.02, "rate = {rate}");
    }

    #[test]
    fn seeded_selection_is_reproducible() {
        let moves = mixed_position();
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..50)
                .map(|_| select_move(&moves, StyleTag::Mixed, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(5), picks(5));
    }
}
