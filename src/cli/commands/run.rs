//! Scheduler command: evaluate the watchlist until Ctrl-C.

use anyhow::Result;
use std::path::Path;
use tokio::sync::watch;
use tracing::{info, warn};

use heikin_engine::Scheduler;

use super::{build_evaluator, load_valid_config};
use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config_path: &Path) -> Result<()> {
    let config = load_valid_config(config_path)?;
    let evaluator = build_evaluator(&config, args.dry_run)?;
    let scheduler = Scheduler::new(evaluator, &config.schedule);

    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                let _ = tx.send(true);
            }
            Err(e) => {
                warn!(error = %e, "Ctrl-C handler unavailable");
                // Keep the sender alive so the scheduler keeps running
                std::future::pending::<()>().await;
            }
        }
    });

    let summary = scheduler.run(rx).await;
    println!(
        "{} cycles, {} orders placed, {} orders failed",
        summary.cycles, summary.orders, summary.failed_orders
    );

    Ok(())
}
