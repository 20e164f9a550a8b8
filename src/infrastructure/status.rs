//! Status file for external monitoring.
//!
//! Writes a JSON status file that external tools can poll to follow the
//! running arena: match inventory, money at stake and settlement totals.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::settlement::SettlementSummary;
use crate::domain::fixture::{Match, MatchStatus};
use crate::error::Result;
use crate::port::outbound::notifier::{ArenaEvent, Notifier};

/// Current status file format version.
const STATUS_VERSION: &str = "1";

/// Top-level status file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusFile {
    /// Schema version for forward compatibility.
    pub version: String,
    /// When the process started.
    pub started_at: DateTime<Utc>,
    /// Process ID.
    pub pid: u32,
    /// Static configuration snapshot.
    pub config: StatusConfig,
    /// Match inventory and open stake.
    pub matches: StatusMatches,
    /// Totals since process start.
    pub totals: StatusTotals,
    /// When this file was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Static configuration snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    pub personalities: usize,
    pub min_active: usize,
    pub min_upcoming: usize,
    pub move_ceiling: usize,
    pub platform_fee: Decimal,
}

/// Counts per match status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMatches {
    pub scheduled: usize,
    pub in_progress: usize,
    pub completed: usize,
    /// Total stake on matches that have not been settled.
    pub open_stake: Decimal,
}

impl StatusMatches {
    /// Summarize a set of matches.
    #[must_use]
    pub fn from_matches<'a>(matches: impl IntoIterator<Item = &'a Match>) -> Self {
        let mut out = Self::default();
        for m in matches {
            match m.status() {
                MatchStatus::Scheduled => out.scheduled += 1,
                MatchStatus::InProgress => out.in_progress += 1,
                MatchStatus::Completed => out.completed += 1,
            }
            if m.status() != MatchStatus::Completed {
                out.open_stake += m.pool().total();
            }
        }
        out
    }
}

/// Activity counters since process start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusTotals {
    pub matches_created: u64,
    pub matches_completed: u64,
    pub moves_committed: u64,
    pub bets_settled: u64,
    pub paid_out: Decimal,
    pub retained: Decimal,
}

/// Writer for the status file.
///
/// Thread-safe wrapper that manages atomic updates to the status file.
pub struct StatusWriter {
    /// Path to write the status file.
    path: PathBuf,
    /// Current status state.
    status: Mutex<StatusFile>,
}

impl StatusWriter {
    /// Create a new status writer.
    #[must_use]
    pub fn new(path: PathBuf, config: StatusConfig) -> Self {
        let now = Utc::now();
        let status = StatusFile {
            version: STATUS_VERSION.to_string(),
            started_at: now,
            pid: std::process::id(),
            config,
            matches: StatusMatches::default(),
            totals: StatusTotals::default(),
            updated_at: now,
        };

        Self {
            path,
            status: Mutex::new(status),
        }
    }

    /// Write the current status to the file atomically.
    ///
    /// Uses write-to-temp-then-rename. Creates the parent directory if it
    /// doesn't exist.
    #[allow(clippy::result_large_err)]
    pub fn write(&self) -> Result<()> {
        // Serialize under the lock, release before I/O
        let json = {
            let mut status = self.status.lock();
            status.updated_at = Utc::now();
            serde_json::to_string_pretty(&*status)?
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }

    /// Replace the inventory snapshot.
    pub fn update_matches(&self, matches: StatusMatches) {
        self.status.lock().matches = matches;
    }

    pub fn record_created(&self, count: usize) {
        self.status.lock().totals.matches_created += count as u64;
    }

    pub fn record_move(&self) {
        self.status.lock().totals.moves_committed += 1;
    }

    /// Record a completed match and its settlement.
    pub fn record_settlement(&self, summary: &SettlementSummary) {
        let mut status = self.status.lock();
        status.totals.matches_completed += 1;
        status.totals.bets_settled += (summary.winners + summary.losers) as u64;
        status.totals.paid_out += summary.paid_out;
        status.totals.retained += summary.retained;
    }

    /// Copy of the current status.
    #[must_use]
    pub fn snapshot(&self) -> StatusFile {
        self.status.lock().clone()
    }
}

/// Notifier that feeds arena events into a [`StatusWriter`].
pub struct StatusNotifier {
    writer: Arc<StatusWriter>,
}

impl StatusNotifier {
    #[must_use]
    pub const fn new(writer: Arc<StatusWriter>) -> Self {
        Self { writer }
    }
}

impl Notifier for StatusNotifier {
    fn notify(&self, event: ArenaEvent) {
        match event {
            ArenaEvent::MoveCommitted(_) => self.writer.record_move(),
            ArenaEvent::BetsSettled(e) => self.writer.record_settlement(&SettlementSummary {
                winners: e.winners,
                losers: e.losers,
                total_pool: e.total_pool,
                paid_out: e.paid_out,
                retained: e.retained,
            }),
            ArenaEvent::MatchCreated(_)
            | ArenaEvent::MatchStarted(_)
            | ArenaEvent::MatchCompleted(_)
            | ArenaEvent::BetPlaced(_) => {}
        }
    }
}
