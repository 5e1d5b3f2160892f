//! One evaluation cycle over the watchlist.
//!
//! Symbols are processed sequentially in sorted order. For each symbol the
//! bars, price, position and cash are read fresh, a signal is computed and
//! the decision engine emits at most one order. No failure escapes a cycle:
//! it is recorded as a skipped or failed outcome and the next symbol runs.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use heikin_core::error::{DataError, StrategyError};
use heikin_core::traits::{Broker, MarketData, Strategy};
use heikin_core::types::Timeframe;
use heikin_data::CsvBarStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::decision::{Decision, DecisionEngine, SymbolState};
use crate::report::{CycleReport, Outcome, SkipReason};

/// Where the symbols of a cycle come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchlistConfig {
    /// Explicit candidates
    pub symbols: Vec<String>,
    /// Add currently held symbols
    pub include_positions: bool,
    /// Add active tradable assets listed on this exchange
    pub exchange: Option<String>,
    /// Cap on exchange-derived candidates
    pub max_candidates: Option<usize>,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            include_positions: true,
            exchange: None,
            max_candidates: None,
        }
    }
}

impl WatchlistConfig {
    /// Whether any candidate source is configured.
    pub fn has_source(&self) -> bool {
        !self.symbols.is_empty() || self.include_positions || self.exchange.is_some()
    }
}

/// Evaluates cycles against a broker and a market data source.
pub struct Evaluator {
    broker: Arc<dyn Broker>,
    data: Arc<dyn MarketData>,
    strategy: Arc<dyn Strategy>,
    engine: DecisionEngine,
    timeframe: Timeframe,
    lookback: usize,
    watchlist: WatchlistConfig,
    bar_store: Option<CsvBarStore>,
}

impl Evaluator {
    pub fn new(
        broker: Arc<dyn Broker>,
        data: Arc<dyn MarketData>,
        strategy: Arc<dyn Strategy>,
        engine: DecisionEngine,
    ) -> Self {
        Self {
            broker,
            data,
            strategy,
            engine,
            timeframe: Timeframe::Daily,
            lookback: 100,
            watchlist: WatchlistConfig::default(),
            bar_store: None,
        }
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe, lookback: usize) -> Self {
        self.timeframe = timeframe;
        self.lookback = lookback;
        self
    }

    pub fn with_watchlist(mut self, watchlist: WatchlistConfig) -> Self {
        self.watchlist = watchlist;
        self
    }

    /// Persist every fetched history to `store`.
    pub fn with_bar_store(mut self, store: CsvBarStore) -> Self {
        self.bar_store = Some(store);
        self
    }

    pub fn broker(&self) -> &Arc<dyn Broker> {
        &self.broker
    }

    /// Sorted union of configured symbols, held positions and exchange
    /// candidates. Source failures are logged and that source is skipped.
    pub async fn watchlist(&self) -> Vec<String> {
        let mut symbols: BTreeSet<String> = self
            .watchlist
            .symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        if let Some(exchange) = &self.watchlist.exchange {
            match self.broker.tradable_symbols(exchange).await {
                Ok(candidates) => {
                    let limit = self.watchlist.max_candidates.unwrap_or(usize::MAX);
                    symbols.extend(candidates.into_iter().take(limit));
                }
                Err(e) => warn!(exchange = %exchange, error = %e, "Failed to list tradable symbols"),
            }
        }

        if self.watchlist.include_positions {
            match self.broker.get_positions().await {
                Ok(positions) => {
                    symbols.extend(
                        positions
                            .into_iter()
                            .filter(|p| !p.is_flat())
                            .map(|p| p.symbol),
                    );
                }
                Err(e) => warn!(error = %e, "Failed to list positions"),
            }
        }

        symbols.into_iter().collect()
    }

    /// Evaluate every watchlist symbol once.
    pub async fn evaluate_cycle(&self) -> CycleReport {
        let symbols = self.watchlist().await;
        self.evaluate_symbols(&symbols).await
    }

    /// Evaluate the given symbols once, in sorted order.
    pub async fn evaluate_symbols(&self, symbols: &[String]) -> CycleReport {
        let mut symbols = symbols.to_vec();
        symbols.sort();
        symbols.dedup();

        let mut report = CycleReport::new(Utc::now());
        for symbol in &symbols {
            let outcome = self.evaluate_symbol(symbol).await;
            report.push(symbol.clone(), outcome);
        }

        info!("Cycle complete: {}", report.summary());
        report
    }

    /// Read the symbol's state, decide, and submit the resulting order.
    pub async fn evaluate_symbol(&self, symbol: &str) -> Outcome {
        let state = match self.read_state(symbol).await {
            Ok(state) => state,
            Err(reason) => {
                warn!(symbol, "Skipping: {}", reason);
                return Outcome::Skipped { reason };
            }
        };

        match self.engine.decide(&state) {
            Decision::Hold(reason) => {
                debug!(symbol, "Hold: {}", reason);
                Outcome::Held { reason }
            }
            Decision::Act { order, reason } => match self.broker.submit_order(&order).await {
                Ok(ack) => {
                    info!(symbol, order_id = %ack.order_id, "Placed order ({}): {}", reason, order);
                    Outcome::Ordered {
                        action: order,
                        reason,
                        ack,
                    }
                }
                Err(e) => {
                    error!(symbol, error = %e, "Order failed ({}): {}", reason, order);
                    Outcome::OrderFailed {
                        action: order,
                        reason,
                        error: e.to_string(),
                    }
                }
            },
        }
    }

    async fn read_state(&self, symbol: &str) -> Result<SymbolState, SkipReason> {
        let bars = self
            .data
            .get_bars(symbol, self.timeframe, self.lookback)
            .await
            .map_err(feed_failure)?;
        if bars.is_empty() {
            return Err(SkipReason::DataUnavailable("no bars".into()));
        }

        if let Some(store) = &self.bar_store {
            if let Err(e) = store.save(symbol, &bars) {
                warn!(symbol, error = %e, "Failed to persist bar history");
            }
        }

        let price = self
            .data
            .get_current_price(symbol)
            .await
            .map_err(feed_failure)?
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| SkipReason::DataUnavailable("no current price".into()))?;

        let position = self
            .broker
            .get_position(symbol)
            .await
            .map_err(|e| SkipReason::PositionLookupFailure(e.to_string()))?;
        let cash = match self.broker.get_account_cash().await {
            Ok(cash) => Some(cash),
            Err(e) => {
                warn!(symbol, error = %e, "Failed to read account cash");
                None
            }
        };

        let signal = match self.strategy.evaluate(symbol, &bars, price) {
            Ok(signal) => {
                debug!(
                    symbol,
                    direction = %signal.direction,
                    confirmed = signal.confirmed,
                    current = %signal.current_bar,
                    previous = %signal.previous_bar,
                    trend = %signal.trend,
                    price,
                    reference = signal.reference,
                    "Signal"
                );
                Some(signal)
            }
            Err(StrategyError::InsufficientData {
                required,
                available,
            }) => {
                debug!(symbol, required, available, "Not enough history for a signal");
                None
            }
            Err(e) => {
                warn!(symbol, error = %e, "Signal evaluation failed");
                None
            }
        };

        Ok(SymbolState {
            symbol: symbol.to_string(),
            price,
            signal,
            position,
            cash,
        })
    }
}

fn feed_failure(e: DataError) -> SkipReason {
    match e {
        DataError::ConnectionError(msg) => SkipReason::TransientFeedFailure(msg),
        other => SkipReason::DataUnavailable(other.to_string()),
    }
}
