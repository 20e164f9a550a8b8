//! Rules engine adapter backed by `shakmaty`.
//!
//! `shakmaty` positions carry no game history, so [`ChessPosition`] keeps a
//! repetition table of Zobrist keys next to the board to detect threefold
//! repetition.

use std::collections::HashMap;

use shakmaty::san::{San, SanPlus};
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{Chess, Color, EnPassantMode, Move, Position, Role};

use crate::domain::outcome::Side;
use crate::domain::rules::{CandidateMove, PieceKind, Termination};
use crate::error::RulesError;
use crate::port::outbound::rules::RulesEngine;

/// Half-move clock value at which the fifty-move rule applies.
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Occurrences of the same position that make a threefold repetition.
const REPETITION_LIMIT: u8 = 3;

/// A board position plus the repetition history that led to it.
#[derive(Debug, Clone)]
pub struct ChessPosition {
    chess: Chess,
    repetitions: HashMap<u64, u8>,
}

impl ChessPosition {
    fn new(chess: Chess) -> Self {
        let mut position = Self {
            chess,
            repetitions: HashMap::new(),
        };
        position.record();
        position
    }

    /// The underlying `shakmaty` position.
    #[must_use]
    pub fn chess(&self) -> &Chess {
        &self.chess
    }

    fn key(&self) -> u64 {
        let Zobrist64(key) = self.chess.zobrist_hash::<Zobrist64>(EnPassantMode::Legal);
        key
    }

    fn record(&mut self) {
        *self.repetitions.entry(self.key()).or_insert(0) += 1;
    }

    fn repetition_count(&self) -> u8 {
        self.repetitions.get(&self.key()).copied().unwrap_or(0)
    }
}

/// Standard chess rules via `shakmaty`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyRules;

impl ShakmatyRules {
    /// Create a new rules engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RulesEngine for ShakmatyRules {
    type Position = ChessPosition;

    fn initial_position(&self) -> ChessPosition {
        ChessPosition::new(Chess::default())
    }

    fn legal_moves(&self, position: &ChessPosition) -> Vec<CandidateMove> {
        let chess = &position.chess;
        chess
            .legal_moves()
            .iter()
            .map(|m| annotate(chess, m))
            .collect()
    }

    fn apply_move(&self, position: &ChessPosition, san: &str) -> Result<ChessPosition, RulesError> {
        let parsed: SanPlus = san.parse().map_err(|_| RulesError::InvalidNotation {
            san: san.to_string(),
        })?;
        let m = parsed
            .san
            .to_move(&position.chess)
            .map_err(|e| RulesError::IllegalMove {
                san: san.to_string(),
                reason: e.to_string(),
            })?;

        let mut next = position.clone();
        next.chess.play_unchecked(&m);
        next.record();
        Ok(next)
    }

    fn termination(&self, position: &ChessPosition) -> Option<Termination> {
        let chess = &position.chess;
        if chess.is_checkmate() {
            Some(Termination::Checkmate {
                side_to_move: side(chess.turn()),
            })
        } else if chess.is_stalemate() {
            Some(Termination::Stalemate)
        } else if chess.is_insufficient_material() {
            Some(Termination::InsufficientMaterial)
        } else if chess.halfmoves() >= FIFTY_MOVE_HALFMOVES {
            Some(Termination::FiftyMoveRule)
        } else if position.repetition_count() >= REPETITION_LIMIT {
            Some(Termination::ThreefoldRepetition)
        } else {
            None
        }
    }

    fn side_to_move(&self, position: &ChessPosition) -> Side {
        side(position.chess.turn())
    }

    fn is_check(&self, position: &ChessPosition) -> bool {
        position.chess.is_check()
    }
}

fn annotate(chess: &Chess, m: &Move) -> CandidateMove {
    let san = San::from_move(chess, m);
    let mut after = chess.clone();
    after.play_unchecked(m);
    let gives_check = after.is_check();
    let suffix = if after.is_checkmate() {
        "#"
    } else if gives_check {
        "+"
    } else {
        ""
    };

    CandidateMove {
        san: format!("{san}{suffix}"),
        piece: piece_kind(m.role()),
        is_capture: m.is_capture(),
        gives_check,
        is_castle: m.is_castle(),
    }
}

const fn piece_kind(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

const fn side(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}
