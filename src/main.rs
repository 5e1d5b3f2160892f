//! Heikin-Ashi market-signal bot.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use heikin_monitor::setup_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging settings come from the file when it loads; flags win
    let logging = heikin_config::load_config(&cli.config)
        .map(|config| config.logging)
        .unwrap_or_default();
    let level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or(logging.level);
    let json = cli.json_logs || logging.format == "json";
    let _guard = setup_logging(&level, json, logging.file.as_deref())
        .context("Failed to set up logging")?;

    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, &cli.config).await,
        Commands::Once(args) => cli::commands::once::run(args, &cli.config).await,
        Commands::Signals(args) => cli::commands::signals::run(args, &cli.config).await,
        Commands::Strategies => cli::commands::strategies::run().await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
