//! Shared fixtures: raw bar histories with known Heikin-Ashi labels.

#![allow(dead_code)]

use std::sync::Arc;

use heikin_broker::PaperBroker;
use heikin_core::types::{Bar, BarType};
use heikin_engine::{DecisionEngine, Evaluator, WatchlistConfig};
use heikin_strategy::HeikinAshiStrategy;
use rust_decimal_macros::dec;

pub const DAY_MS: i64 = 86_400_000;

/// Raw bars whose HA transform yields exactly `labels`.
///
/// The first label must be `Indecisive` so the first HA open equals `base`.
/// All offsets are multiples of 1/4, so every HA value is exact.
pub fn bars_with_labels(base: f64, labels: &[BarType]) -> Vec<Bar> {
    let mut ha_open = base;
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let o = ha_open;
            let bar = match label {
                BarType::Bull => Bar::new(i as i64 * DAY_MS, o + 1.0, o + 3.0, o, o + 2.0, 1_000.0),
                BarType::Bear => Bar::new(i as i64 * DAY_MS, o - 1.0, o, o - 3.0, o - 2.0, 1_000.0),
                BarType::Indecisive => Bar::new(i as i64 * DAY_MS, o, o + 2.0, o - 2.0, o, 1_000.0),
            };
            ha_open = (ha_open + bar.ohlc4()) / 2.0;
            bar
        })
        .collect()
}

/// 30 quiet bars followed by a 10-bar window.
pub fn history(window: &[BarType]) -> Vec<Bar> {
    let mut labels = vec![BarType::Indecisive; 30];
    labels.extend_from_slice(window);
    bars_with_labels(64.0, &labels)
}

/// Window that reads as a pullback ending in two bull bars.
pub fn pullback_window() -> Vec<BarType> {
    use BarType::*;
    vec![Bear, Bear, Bear, Bear, Bear, Bear, Indecisive, Indecisive, Bull, Bull]
}

/// Window that reads as a drop ending in two bear bars.
pub fn drop_window() -> Vec<BarType> {
    use BarType::*;
    vec![Bull, Bull, Bull, Bull, Bull, Bull, Indecisive, Bull, Bear, Bear]
}

pub fn paper() -> Arc<PaperBroker> {
    Arc::new(PaperBroker::new(dec!(1000)))
}

pub fn evaluator(broker: &Arc<PaperBroker>, watchlist: WatchlistConfig) -> Evaluator {
    Evaluator::new(
        broker.clone(),
        broker.clone(),
        Arc::new(HeikinAshiStrategy::default()),
        DecisionEngine::default(),
    )
    .with_watchlist(watchlist)
}

pub fn symbols(list: &[&str]) -> WatchlistConfig {
    WatchlistConfig {
        symbols: list.iter().map(|s| s.to_string()).collect(),
        include_positions: false,
        ..Default::default()
    }
}
