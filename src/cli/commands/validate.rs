//! Validate configuration command.

use anyhow::{bail, Result};
use std::path::Path;
use heikin_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Alpaca paper mode: {}", config.alpaca.paper);
    println!("Strategy preset: {}", config.strategy.preset_name());
    println!("Risk fraction: {}", config.risk.risk_fraction);
    println!(
        "Exit margins: +{} / -{}",
        config.risk.profit_margin, config.risk.loss_margin
    );
    println!(
        "Schedule: {} bars x{}, every {}s",
        config.schedule.timeframe, config.schedule.lookback, config.schedule.cadence_secs
    );
    println!("Watchlist: {:?}", config.watchlist.symbols);

    let errors = config.validate();
    if !errors.is_empty() {
        println!();
        for error in &errors {
            println!("  - {}", error);
        }
        bail!("{} configuration problem(s)", errors.len());
    }

    println!();
    println!("Configuration is valid!");
    Ok(())
}
