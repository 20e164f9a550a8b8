//! Knightwatch - an autonomous chess-personality arena.
//!
//! A roster of chess "personalities" plays matches against each other with
//! no human input. Each personality has a style that biases which legal move
//! it picks. Spectators bet on match outcomes before a match starts and
//! winners share the pool after a platform fee.
//!
//! # Architecture
//!
//! - **`domain`** - Personalities, matches, pools and bets with their
//!   invariants. No I/O.
//! - **`port`** - Traits the application depends on: the rules engine, the
//!   match and bet store, and event notifiers.
//! - **`application`** - Move selection, pacing, the lifecycle manager,
//!   matchmaking, betting and pari-mutuel settlement.
//! - **`adapter`** - `shakmaty`-backed rules, the in-memory store and the
//!   CLI.
//! - **`infrastructure`** - Configuration, runtime wiring, the scheduler
//!   loop and the status file.
//!
//! # Example
//!
//! ```no_run
//! use knightwatch::infrastructure::config::settings::Config;
//! use knightwatch::infrastructure::orchestration::run_with_shutdown;
//! use tokio::sync::watch;
//!
//! # async fn run() -> knightwatch::error::Result<()> {
//! let config = Config::load_or_default("config.toml")?;
//! config.init_logging();
//! let (_stop, shutdown) = watch::channel(false);
//! run_with_shutdown(config, shutdown).await
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
