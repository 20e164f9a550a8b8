//! Chess rules engine port.
//!
//! Legal-move generation, move application and terminal detection are
//! provided by an adapter; the arena never reimplements chess rules.

use crate::domain::outcome::Side;
use crate::domain::rules::{CandidateMove, Termination};
use crate::error::RulesError;

/// Failure while replaying a move history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayError {
    /// Zero-based index of the move that could not be applied.
    pub ply: usize,
    pub source: RulesError,
}

/// Rules engine used to validate and apply moves.
///
/// Positions and moves are exchanged as text (SAN) so history stays
/// human-auditable and persistable.
pub trait RulesEngine: Send + Sync {
    /// Position representation owned by the engine.
    type Position: Clone + Send + Sync;

    /// The standard starting position.
    fn initial_position(&self) -> Self::Position;

    /// Every legal move in `position`, annotated. Empty for terminal positions.
    fn legal_moves(&self, position: &Self::Position) -> Vec<CandidateMove>;

    /// Apply a SAN move, returning the resulting position.
    fn apply_move(&self, position: &Self::Position, san: &str) -> Result<Self::Position, RulesError>;

    /// Terminal condition of `position`, if any.
    fn termination(&self, position: &Self::Position) -> Option<Termination>;

    /// Side whose turn it is.
    fn side_to_move(&self, position: &Self::Position) -> Side;

    /// Check if the side to move is in check.
    fn is_check(&self, position: &Self::Position) -> bool;

    /// Replay `moves` from the initial position.
    fn replay(&self, moves: &[String]) -> Result<Self::Position, ReplayError> {
        let mut position = self.initial_position();
        for (ply, san) in moves.iter().enumerate() {
            position = self
                .apply_move(&position, san)
                .map_err(|source| ReplayError { ply, source })?;
        }
        Ok(position)
    }
}
