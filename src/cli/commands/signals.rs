//! Offline signal inspection from CSV bar history.

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Serialize;
use std::path::Path;
use tracing::warn;

use heikin_config::{load_config, AppConfig};
use heikin_core::traits::{Indicator, MarketData, Strategy};
use heikin_core::types::{Bar, HeikinAshiBar, Signal, TrendVerdict};
use heikin_data::{CsvBarStore, CsvMarketData};
use heikin_indicators::Rsi;
use heikin_strategy::{CandleAnalysis, HeikinAshiStrategy, StrategyRegistry, TrendCounts};

use crate::cli::{OutputFormat, SignalsArgs};

#[derive(Serialize)]
struct WindowRow {
    #[serde(flatten)]
    bar: HeikinAshiBar,
    /// RSI of the raw closes at this bar
    rsi: Option<f64>,
    oversold: bool,
}

#[derive(Serialize)]
struct SymbolSignals {
    symbol: String,
    bars: usize,
    window: Vec<WindowRow>,
    /// Bars in the fetched history with RSI below the oversold mark
    oversold_bars: usize,
    counts: TrendCounts,
    trend: TrendVerdict,
    signal: Option<Signal>,
    note: Option<String>,
}

pub async fn run(args: SignalsArgs, config_path: &Path) -> Result<()> {
    let config = if config_path.exists() {
        load_config(config_path)
            .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?
    } else {
        AppConfig::default()
    };

    let mut strategy_settings = config.strategy.clone();
    if let Some(preset) = args.preset {
        strategy_settings.preset = Some(preset);
    }
    let strategy = StrategyRegistry::create_with(
        strategy_settings
            .resolve()
            .context("Invalid strategy configuration")?,
    )?;

    let data = CsvMarketData::new(CsvBarStore::new(&args.data));
    let mut results = Vec::new();
    for symbol in &args.symbols {
        let symbol = symbol.trim().to_uppercase();
        match inspect(&strategy, &data, &symbol, &config, args.rsi_period).await {
            Ok(result) => results.push(result),
            Err(e) => warn!(symbol = %symbol, error = %e, "Skipping"),
        }
    }

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Text => {
            println!("Strategy: {}", strategy.name());
            for result in &results {
                print_text(result);
            }
        }
    }

    Ok(())
}

async fn inspect(
    strategy: &HeikinAshiStrategy,
    data: &CsvMarketData,
    symbol: &str,
    config: &AppConfig,
    rsi_period: usize,
) -> Result<SymbolSignals> {
    let bars = data
        .get_bars(symbol, config.schedule.timeframe, config.schedule.lookback)
        .await?;
    let price = data
        .get_current_price(symbol)
        .await?
        .with_context(|| format!("no bars stored for {symbol}"))?;

    let analysis = CandleAnalysis::from_bars(&bars, strategy.config().trend_window)?;
    let (signal, note) = match strategy.evaluate(symbol, &bars, price) {
        Ok(signal) => (Some(signal), None),
        Err(e) => (None, Some(e.to_string())),
    };

    let rsi = Rsi::new(rsi_period).calculate(&Bar::closes(&bars));
    let oversold_bars = rsi.iter().flatten().filter(|v| Rsi::is_oversold(**v)).count();
    let window = analysis
        .window()
        .iter()
        .zip(&rsi[rsi.len() - analysis.window_len..])
        .map(|(bar, &value)| WindowRow {
            bar: *bar,
            rsi: value,
            oversold: value.is_some_and(Rsi::is_oversold),
        })
        .collect();

    Ok(SymbolSignals {
        symbol: symbol.to_string(),
        bars: bars.len(),
        window,
        oversold_bars,
        counts: analysis.counts,
        trend: analysis.trend,
        signal,
        note,
    })
}

fn print_text(result: &SymbolSignals) {
    println!();
    println!("{} ({} bars)", result.symbol, result.bars);
    println!(
        "  {:<19} {:>10} {:>10} {:>10} {:>10} {:>6}  {}",
        "time", "open", "high", "low", "close", "rsi", "type"
    );
    for row in &result.window {
        let bar = &row.bar;
        let time = DateTime::from_timestamp_millis(bar.timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let label = bar.bar_type.map(|t| t.to_string()).unwrap_or_default();
        let rsi = row.rsi.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<19} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>6}  {}{}",
            time,
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            rsi,
            label,
            if row.oversold { " (oversold)" } else { "" }
        );
    }
    println!("  oversold bars in history: {}", result.oversold_bars);
    println!(
        "  trend: {} (bull {}, bear {}, indecisive {})",
        result.trend, result.counts.bull, result.counts.bear, result.counts.indecisive
    );

    match (&result.signal, &result.note) {
        (Some(signal), _) => {
            let stop = signal
                .stop_loss_price
                .map(|s| format!("{s:.2}"))
                .unwrap_or_else(|| "none".to_string());
            println!(
                "  signal: {} {} (price {:.2}, reference {:.2}, stop {})",
                signal.direction,
                if signal.confirmed { "confirmed" } else { "unconfirmed" },
                signal.price,
                signal.reference,
                stop
            );
        }
        (None, Some(note)) => println!("  signal: none ({note})"),
        (None, None) => println!("  signal: none"),
    }
}
