//! Exchange-free domain types for the arena.
//!
//! Everything here is plain data plus the invariants that guard it. No I/O,
//! no clocks, no randomness.

pub mod bet;
pub mod error;
pub mod fixture;
pub mod id;
pub mod outcome;
pub mod personality;
pub mod pool;
pub mod rules;

pub use bet::{Bet, BetStatus};
pub use error::DomainError;
pub use fixture::{Match, MatchStatus, MatchType, NewMatch};
pub use id::{BetId, BettorId, MatchId, PersonalityId};
pub use outcome::{Outcome, Side};
pub use personality::{Personality, PersonalityRegistry, SearchBudget, StyleTag};
pub use pool::Pool;
pub use rules::{CandidateMove, CompletionReason, PieceKind, Termination};
