//! CLI module graph.

pub mod command;
pub mod config;
pub mod output;
pub mod roster;
pub mod run;
pub mod simulate;
