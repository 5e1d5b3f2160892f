//! CLI command implementations.

pub mod once;
pub mod run;
pub mod signals;
pub mod strategies;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use heikin_broker::{AlpacaBroker, AlpacaConfig, DryRunBroker};
use heikin_config::{load_config, AppConfig};
use heikin_core::traits::{Broker, MarketData, Strategy};
use heikin_data::CsvBarStore;
use heikin_engine::{DecisionEngine, Evaluator};
use heikin_risk::RiskSizer;
use heikin_strategy::HeikinAshiStrategy;
use tracing::info;

/// Load the configuration and refuse to continue on any violation.
pub fn load_valid_config(path: &Path) -> Result<AppConfig> {
    let config = load_config(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    let errors = config.validate();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(config)
}

/// Build the evaluator against Alpaca from the configuration.
pub fn build_evaluator(config: &AppConfig, dry_run: bool) -> Result<Evaluator> {
    let alpaca = AlpacaConfig::from_env(
        &config.alpaca.api_key_env,
        &config.alpaca.api_secret_env,
        config.alpaca.paper,
    )
    .context("Alpaca credentials not available")?
    .with_data_feed(config.alpaca.data_feed.clone())
    .with_time_in_force(config.alpaca.time_in_force.clone());

    let data: Arc<dyn MarketData> = Arc::new(
        AlpacaBroker::new(alpaca.clone()).context("Failed to create Alpaca data client")?,
    );
    let trading = AlpacaBroker::new(alpaca).context("Failed to create Alpaca client")?;
    let broker: Arc<dyn Broker> = if dry_run {
        Arc::new(DryRunBroker::new(trading))
    } else {
        Arc::new(trading)
    };

    let strategy_config = config
        .strategy
        .resolve()
        .context("Invalid strategy configuration")?;
    let strategy: Arc<dyn Strategy> = Arc::new(HeikinAshiStrategy::new(strategy_config));

    info!(
        broker = broker.name(),
        strategy = strategy.name(),
        paper = config.alpaca.paper,
        dry_run,
        "Evaluator ready"
    );

    let mut evaluator = Evaluator::new(
        broker,
        data,
        strategy,
        DecisionEngine::new(RiskSizer::new(&config.risk)),
    )
    .with_timeframe(config.schedule.timeframe, config.schedule.lookback)
    .with_watchlist(config.watchlist.clone());

    if let Some(dir) = &config.data.bar_store {
        evaluator = evaluator.with_bar_store(CsvBarStore::new(dir));
    }
    Ok(evaluator)
}
