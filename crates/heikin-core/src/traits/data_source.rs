//! Market data trait definitions.

use crate::error::DataError;
use crate::types::{Bar, Timeframe};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A top-of-book quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol
    pub symbol: String,
    /// Best bid price
    pub bid: f64,
    /// Best ask price
    pub ask: f64,
    /// Timestamp (Unix milliseconds)
    pub timestamp: i64,
}

impl Quote {
    /// Get the mid price.
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Best-effort price: the mid when both sides are quoted, otherwise
    /// whichever side is present.
    pub fn price(&self) -> Option<f64> {
        match (self.bid > 0.0, self.ask > 0.0) {
            (true, true) => Some(self.mid()),
            (true, false) => Some(self.bid),
            (false, true) => Some(self.ask),
            (false, false) => None,
        }
    }
}

/// Trait for market data collaborators.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch the most recent bars.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `timeframe` - The bar interval
    /// * `lookback` - Maximum number of bars to return
    ///
    /// # Returns
    /// Bars ordered from oldest to newest, unique by timestamp. An empty
    /// vector means no data, not an error.
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, DataError>;

    /// Most recent trade or quote price, if any.
    async fn get_current_price(&self, symbol: &str) -> Result<Option<f64>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
