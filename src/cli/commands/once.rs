//! Single-cycle command.

use anyhow::Result;
use std::path::Path;

use super::{build_evaluator, load_valid_config};
use crate::cli::{OnceArgs, OutputFormat};

pub async fn run(args: OnceArgs, config_path: &Path) -> Result<()> {
    let config = load_valid_config(config_path)?;
    let evaluator = build_evaluator(&config, args.dry_run)?;

    let report = if args.symbols.is_empty() {
        evaluator.evaluate_cycle().await
    } else {
        let symbols: Vec<String> = args
            .symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        evaluator.evaluate_symbols(&symbols).await
    };

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", report.render()),
    }

    Ok(())
}
