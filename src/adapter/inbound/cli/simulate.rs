//! Handler for the `simulate` command: one match, no pauses, no betting.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::json;

use crate::adapter::inbound::cli::command::SimulateArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::chess::ShakmatyRules;
use crate::adapter::outbound::memory::MemoryStore;
use crate::application::context::ArenaContext;
use crate::application::lifecycle::LifecycleManager;
use crate::application::matchmaking::Matchmaker;
use crate::domain::fixture::Match;
use crate::domain::id::PersonalityId;
use crate::domain::rules::CompletionReason;
use crate::error::Result;
use crate::infrastructure::bootstrap::rng_from_seed;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::notifier::{ArenaEvent, Notifier, NotifierRegistry};

/// Keeps the completion reason of the simulated match.
#[derive(Default)]
struct CompletionCapture {
    reason: Arc<Mutex<Option<CompletionReason>>>,
}

impl Notifier for CompletionCapture {
    fn notify(&self, event: ArenaEvent) {
        if let ArenaEvent::MatchCompleted(e) = event {
            *self.reason.lock() = Some(e.reason);
        }
    }
}

/// Outcome of a simulated match.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub finished: Match,
    pub reason: Option<CompletionReason>,
}

/// Play `white` against `black` to completion on an in-memory store.
pub async fn simulate(config: &Config, white: u32, black: u32) -> Result<Simulation> {
    let capture = CompletionCapture::default();
    let reason = Arc::clone(&capture.reason);
    let mut notifiers = NotifierRegistry::new();
    notifiers.register(Box::new(capture));

    let ctx = ArenaContext::new(
        Arc::new(MemoryStore::new()),
        Arc::new(config.registry()),
        Arc::new(notifiers),
    );
    let lifecycle = LifecycleManager::new(
        ctx.clone(),
        Arc::new(ShakmatyRules::new()),
        config.lifecycle_settings(),
        rng_from_seed(config.seed),
    );
    let matchmaker = Matchmaker::new(
        ctx,
        config.matchmaking_settings(),
        rng_from_seed(config.seed.map(|seed| seed.wrapping_add(1))),
    );

    let created = matchmaker
        .create_between(
            PersonalityId::new(white),
            PersonalityId::new(black),
            Utc::now(),
            None,
        )
        .await?;
    let finished = lifecycle.run_to_completion(created.id()).await?;
    let reason = *reason.lock();
    Ok(Simulation { finished, reason })
}

/// Execute the simulate command.
pub async fn execute(args: &SimulateArgs) -> Result<()> {
    let mut config = Config::load_or_default(&args.config.config)?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let Simulation { finished, reason } = simulate(&config, args.white, args.black).await?;
    let registry = config.registry();
    let name = |id: PersonalityId| {
        registry
            .get(id)
            .map_or_else(|| id.to_string(), |p| p.name.clone())
    };
    let result = finished
        .result()
        .map_or_else(|| "none".to_string(), |r| r.to_string());
    let reason = reason.map_or_else(|| "unknown".to_string(), |r| r.to_string());

    if output::is_json() {
        output::json_output(json!({
            "command": "simulate",
            "white": name(finished.white()),
            "black": name(finished.black()),
            "match_type": finished.match_type().to_string(),
            "time_control": finished.time_control(),
            "moves": finished.moves(),
            "result": result,
            "reason": reason,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("White", name(finished.white()));
    output::field("Black", name(finished.black()));
    output::field("Time control", finished.time_control());
    output::section("Moves");
    output::lines(&movetext(finished.moves()));
    output::section("Result");
    output::field("Winner", &result);
    output::field("Reason", &reason);
    output::field("Plies", finished.ply_count());
    Ok(())
}

/// Numbered movetext, one full move per pair of plies, eight per line.
fn movetext(moves: &[String]) -> String {
    moves
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| format!("{}. {}", i + 1, pair.join(" ")))
        .collect::<Vec<_>>()
        .chunks(8)
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}
