//! Arena runtime lifecycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::adapter::outbound::memory::MemoryStore;
use crate::application::lifecycle::Commit;
use crate::domain::fixture::MatchStatus;
use crate::error::Result;
use crate::infrastructure::bootstrap::{wait_until_ready, Arena};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::status::StatusMatches;
use crate::port::outbound::store::ArenaStore;

/// Build the arena on an in-memory store and run it until `shutdown`.
pub async fn run_with_shutdown(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
    info!(
        seed = ?config.seed,
        move_ceiling = config.lifecycle.move_ceiling,
        platform_fee = %config.betting.platform_fee,
        "Starting knightwatch"
    );

    let store: Arc<dyn ArenaStore> = Arc::new(MemoryStore::new());
    wait_until_ready(store.as_ref(), &config.startup).await?;
    info!("Store ready");

    let arena = Arena::build(&config, store);
    run_arena(
        &arena,
        config.lifecycle_interval(),
        config.matchmaking_interval(),
        shutdown,
    )
    .await
}

/// Drive an already wired arena until `shutdown` flips to true or closes.
pub async fn run_arena(
    arena: &Arena,
    lifecycle_every: Duration,
    matchmaking_every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    replenish(arena).await;

    let mut lifecycle_interval = tokio::time::interval(lifecycle_every);
    lifecycle_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut matchmaking_interval = tokio::time::interval(matchmaking_every);
    matchmaking_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick of an interval completes immediately.
    matchmaking_interval.tick().await;

    info!(
        lifecycle_ms = lifecycle_every.as_millis() as u64,
        matchmaking_ms = matchmaking_every.as_millis() as u64,
        "Arena running"
    );

    loop {
        tokio::select! {
            result = shutdown.changed() => {
                match result {
                    Ok(()) => {
                        if *shutdown.borrow() {
                            info!("Shutdown signal received");
                            break;
                        }
                    }
                    Err(_) => {
                        info!("Shutdown channel closed");
                        break;
                    }
                }
            }
            _ = lifecycle_interval.tick() => {
                lifecycle_tick(arena).await;
                refresh_status(arena).await;
            }
            _ = matchmaking_interval.tick() => {
                replenish(arena).await;
            }
        }
    }

    if let Some(writer) = &arena.status {
        if let Err(e) = writer.write() {
            warn!(error = %e, "Failed to write final status");
        }
    }
    info!(pending = arena.lifecycle.pending_count(), "Arena stopped");
    Ok(())
}

/// One lifecycle pass; planned moves are committed after their pause on
/// separate tasks so slow thinkers never hold up the tick.
async fn lifecycle_tick(arena: &Arena) {
    let report = match arena.lifecycle.tick(Utc::now()).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Lifecycle tick failed");
            return;
        }
    };

    for planned in report.planned {
        let lifecycle = Arc::clone(&arena.lifecycle);
        tokio::spawn(async move {
            let match_id = planned.match_id;
            tokio::time::sleep(planned.delay).await;
            match lifecycle.commit(planned, Utc::now()).await {
                Ok(Commit::Stale) => debug!(match_id = %match_id, "Planned move went stale"),
                Ok(_) => {}
                Err(e) => {
                    error!(match_id = %match_id, error = %e, "Failed to commit move");
                    lifecycle.release(match_id);
                }
            }
        });
    }
}

async fn replenish(arena: &Arena) {
    match arena.matchmaker.replenish(Utc::now()).await {
        Ok(report) => {
            if let Some(writer) = &arena.status {
                writer.record_created(report.created());
            }
        }
        Err(e) => error!(error = %e, "Matchmaking pass failed"),
    }
}

async fn refresh_status(arena: &Arena) {
    let Some(writer) = &arena.status else {
        return;
    };

    let mut matches = Vec::new();
    for status in [
        MatchStatus::Scheduled,
        MatchStatus::InProgress,
        MatchStatus::Completed,
    ] {
        match arena.ctx.store.matches_by_status(status).await {
            Ok(found) => matches.extend(found),
            Err(e) => {
                warn!(error = %e, "Failed to read matches for status");
                return;
            }
        }
    }

    writer.update_matches(StatusMatches::from_matches(&matches));
    if let Err(e) = writer.write() {
        warn!(error = %e, "Failed to write status file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::lifecycle::PacingConfig;
    use crate::port::outbound::store::MatchStore;

    fn fast_config(status_file: Option<std::path::PathBuf>) -> Config {
        let mut config = Config {
            seed: Some(11),
            status_file,
            ..Config::default()
        };
        config.lifecycle.pacing = PacingConfig {
            base_ms: 0,
            complex_ms: 0,
            jitter_ms: 0,
            ..PacingConfig::default()
        };
        config
    }

    #[tokio::test]
    async fn arena_plays_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");
        let config = fast_config(Some(path.clone()));
        let store = Arc::new(MemoryStore::new());
        let arena = Arena::build(&config, store.clone());

        let (tx, rx) = watch::channel(false);
        let stopper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            tx.send(true).unwrap();
        });

        run_arena(
            &arena,
            Duration::from_millis(10),
            Duration::from_millis(50),
            rx,
        )
        .await
        .unwrap();
        stopper.await.unwrap();

        let live = store.matches_by_status(MatchStatus::InProgress).await.unwrap();
        let completed = store.matches_by_status(MatchStatus::Completed).await.unwrap();
        let upcoming = store.matches_by_status(MatchStatus::Scheduled).await.unwrap();
        assert!(live.len() + completed.len() >= 2);
        assert!(upcoming.len() >= 5);
        assert!(live.iter().chain(&completed).any(|m| m.ply_count() > 0));

        let status = arena.status.as_ref().unwrap().snapshot();
        assert!(status.totals.matches_created >= 7);
        assert!(status.totals.moves_committed > 0);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn closed_channel_stops_the_loop() {
        let config = fast_config(None);
        let arena = Arena::build(&config, Arc::new(MemoryStore::new()));
        let (tx, rx) = watch::channel(false);
        drop(tx);

        run_arena(&arena, Duration::from_secs(60), Duration::from_secs(60), rx)
            .await
            .unwrap();
    }
}
