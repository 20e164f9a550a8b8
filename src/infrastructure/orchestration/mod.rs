//! Arena orchestration.
//!
//! Runtime wiring and the scheduler loop that drives lifecycle and
//! matchmaking passes.

pub mod runtime;

pub use runtime::{run_arena, run_with_shutdown};
