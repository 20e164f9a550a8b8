//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators the arena depends on: the chess
//! rules engine, match and bet storage, and event notification.

pub mod notifier;
pub mod rules;
pub mod store;
