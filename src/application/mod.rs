//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the arena's use cases.

pub mod betting;
pub mod context;
pub mod lifecycle;
pub mod locks;
pub mod matchmaking;
pub mod pacing;
pub mod selector;
pub mod settlement;
