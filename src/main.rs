use clap::Parser;

use knightwatch::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand};
use knightwatch::adapter::inbound::cli::output::{self, OutputConfig};
use knightwatch::adapter::inbound::cli::{config, roster, run, simulate};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Roster(args) => roster::list(args),
        Commands::Simulate(args) => simulate::execute(args).await,
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(&args.config),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args.config),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
