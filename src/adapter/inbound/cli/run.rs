//! Handler for the `run` command.

use tokio::sync::watch;
use tracing::{error, info};

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration::run_with_shutdown;

/// Execute the run command.
///
/// Ctrl-C flips the shutdown channel and the scheduler loop drains.
pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    let mut config = Config::load_or_default(&args.config)?;
    config.logging = config.logging.with_verbosity(output::verbosity());
    config.init_logging();
    print_startup(&config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            return;
        }
        info!("Ctrl-C received");
        let _ = shutdown_tx.send(true);
    });

    run_with_shutdown(config, shutdown_rx).await?;
    info!("knightwatch stopped");
    Ok(())
}

fn print_startup(config: &Config) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Personalities", config.registry().len());
    output::field("Min active", config.matchmaking.min_active);
    output::field("Min upcoming", config.matchmaking.min_upcoming);
    output::field("Move ceiling", config.lifecycle.move_ceiling);
    output::field("Platform fee", config.betting.platform_fee);
    match config.seed {
        Some(seed) => output::field("Seed", seed),
        None => output::field("Seed", "entropy"),
    }
    if let Some(path) = &config.status_file {
        output::field("Status file", path.display());
    }
}
