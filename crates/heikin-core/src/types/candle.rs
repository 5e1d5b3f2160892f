//! Heikin-Ashi candles and the labels derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wick-structure label of a single Heikin-Ashi bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BarType {
    Bull,
    Bear,
    Indecisive,
}

impl fmt::Display for BarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarType::Bull => write!(f, "BULL"),
            BarType::Bear => write!(f, "BEAR"),
            BarType::Indecisive => write!(f, "INDECISIVE"),
        }
    }
}

/// Verdict over a window of bar labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendVerdict {
    Pullback,
    Drop,
    NoTrend,
}

impl fmt::Display for TrendVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendVerdict::Pullback => write!(f, "PULLBACK"),
            TrendVerdict::Drop => write!(f, "DROP"),
            TrendVerdict::NoTrend => write!(f, "NO_TREND"),
        }
    }
}

/// A smoothed candle derived from one raw bar and its predecessors.
///
/// `bar_type` is `None` until the bar has been classified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeikinAshiBar {
    /// Unix timestamp in milliseconds, copied from the source bar
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub bar_type: Option<BarType>,
}

impl HeikinAshiBar {
    /// Return a copy carrying the given label.
    pub fn labeled(mut self, bar_type: BarType) -> Self {
        self.bar_type = Some(bar_type);
        self
    }
}
