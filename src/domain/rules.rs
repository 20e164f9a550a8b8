//! Values exchanged with the chess rules engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::outcome::{Outcome, Side};

/// Kind of the piece being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// A legal move annotated with what the move selector filters on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMove {
    /// Standard algebraic notation including any check/mate suffix.
    pub san: String,
    pub piece: PieceKind,
    pub is_capture: bool,
    pub gives_check: bool,
    pub is_castle: bool,
}

/// Terminal condition reported for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// `side_to_move` has been mated.
    Checkmate { side_to_move: Side },
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    FiftyMoveRule,
}

impl Termination {
    /// Match result implied by this terminal condition.
    ///
    /// Checkmate is won by the side that delivered it, i.e. the side not to
    /// move. Everything else is a draw.
    #[must_use]
    pub const fn outcome(self) -> Outcome {
        match self {
            Self::Checkmate { side_to_move } => Outcome::win_for(side_to_move.opposite()),
            Self::Stalemate
            | Self::ThreefoldRepetition
            | Self::InsufficientMaterial
            | Self::FiftyMoveRule => Outcome::Draw,
        }
    }
}

/// Why a match was completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    Checkmate,
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    FiftyMoveRule,
    /// Forced draw after the configured ply ceiling.
    MoveCeiling,
    /// No legal move on a position the engine did not report as terminal.
    NoLegalMoves,
}

impl From<Termination> for CompletionReason {
    fn from(termination: Termination) -> Self {
        match termination {
            Termination::Checkmate { .. } => Self::Checkmate,
            Termination::Stalemate => Self::Stalemate,
            Termination::ThreefoldRepetition => Self::ThreefoldRepetition,
            Termination::InsufficientMaterial => Self::InsufficientMaterial,
            Termination::FiftyMoveRule => Self::FiftyMoveRule,
        }
    }
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
            Self::ThreefoldRepetition => "threefold_repetition",
            Self::InsufficientMaterial => "insufficient_material",
            Self::FiftyMoveRule => "fifty_move_rule",
            Self::MoveCeiling => "move_ceiling",
            Self::NoLegalMoves => "no_legal_moves",
        };
        f.write_str(reason)
    }
}
