//! Outbound adapters (driven side).

pub mod chess;
pub mod memory;
