//! Thinking-time pacing for spectators.
//!
//! Pauses have no correctness impact. Complex positions (side to move in
//! check, or many legal moves) get a longer base pause, scaled by the
//! personality's search budget, plus random jitter.

use std::time::Duration;

use rand::Rng;

use crate::domain::personality::SearchBudget;

/// Pause parameters in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingSettings {
    pub base_ms: u64,
    pub complex_ms: u64,
    pub jitter_ms: u64,
    /// Legal-move count at or above which a position counts as complex.
    pub complex_move_threshold: usize,
}

impl PacingSettings {
    /// No pauses at all; used for offline simulation.
    pub const INSTANT: Self = Self {
        base_ms: 0,
        complex_ms: 0,
        jitter_ms: 0,
        complex_move_threshold: usize::MAX,
    };
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            base_ms: 1500,
            complex_ms: 3500,
            jitter_ms: 2000,
            complex_move_threshold: 30,
        }
    }
}

/// Computes how long the side to move appears to think.
#[derive(Debug, Clone, Copy)]
pub struct ThinkingTime {
    settings: PacingSettings,
}

impl ThinkingTime {
    #[must_use]
    pub const fn new(settings: PacingSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &PacingSettings {
        &self.settings
    }

    /// Check if a position is complex enough for the longer pause.
    #[must_use]
    pub const fn is_complex(&self, in_check: bool, legal_moves: usize) -> bool {
        in_check || legal_moves >= self.settings.complex_move_threshold
    }

    /// Delay before committing the next move.
    pub fn delay<R: Rng + ?Sized>(
        &self,
        in_check: bool,
        legal_moves: usize,
        budget: &SearchBudget,
        rng: &mut R,
    ) -> Duration {
        let base = if self.is_complex(in_check, legal_moves) {
            self.settings.complex_ms
        } else {
            self.settings.base_ms
        };
        let scaled = (base as f64 * budget.pace_factor()).round() as u64;

        let jitter_cap = (self.settings.jitter_ms as f64 * budget.jitter_factor()).round() as u64;
        let jitter = if jitter_cap == 0 {
            0
        } else {
            rng.gen_range(0..=jitter_cap)
        };

        Duration::from_millis(scaled + jitter)
    }
}
