//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for personalities, matches and bets.
//! - [`config`] - Canonical test settings (instant pacing, fixed seeds).
//! - [`arena`] - A fully wired arena on an in-memory store with an event
//!   recorder.

pub mod arena;
pub mod config;
pub mod domain;
