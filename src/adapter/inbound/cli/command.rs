//! Command-line interface definitions.
//!
//! Defines the CLI structure for the knightwatch arena using `clap`: running
//! the arena, inspecting the roster, simulating a single match and checking
//! configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Autonomous chess-personality arena with pooled spectator betting
#[derive(Parser, Debug)]
#[command(name = "knightwatch")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the arena scheduler (foreground)
    Run(ConfigPathArg),

    /// List the personality roster
    Roster(ConfigPathArg),

    /// Play one match to completion without pauses
    Simulate(SimulateArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `knightwatch config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared `--config` argument.
#[derive(Args, Debug, Clone)]
pub struct ConfigPathArg {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for `knightwatch simulate`.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// Personality id playing White
    #[arg(long)]
    pub white: u32,

    /// Personality id playing Black
    #[arg(long)]
    pub black: u32,

    /// Seed for move selection; overrides the configured seed
    #[arg(long)]
    pub seed: Option<u64>,
}
