//! Per-cycle trading signals.

use serde::{Deserialize, Serialize};

use super::{BarType, TrendVerdict};

/// Directional bias of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalDirection {
    BuyCandidate,
    SellCandidate,
}

impl std::fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalDirection::BuyCandidate => write!(f, "BUY_CANDIDATE"),
            SignalDirection::SellCandidate => write!(f, "SELL_CANDIDATE"),
        }
    }
}

/// Signal for one symbol in one cycle. Consumed immediately, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Symbol
    pub symbol: String,
    /// Bias from the trend filter
    pub direction: SignalDirection,
    /// Whether the bar/trend conditions for acting on the bias hold
    pub confirmed: bool,
    /// Low of the most recent BEAR bar in the window, if any
    pub stop_loss_price: Option<f64>,
    /// Label of the most recent HA bar
    pub current_bar: BarType,
    /// Label of the HA bar before it
    pub previous_bar: BarType,
    /// Trend over the evaluation window
    pub trend: TrendVerdict,
    /// Price the bias was computed from
    pub price: f64,
    /// Filter value the price (or fast line) was compared against
    pub reference: f64,
    /// Timestamp of the most recent bar (Unix milliseconds)
    pub timestamp: i64,
}

impl Signal {
    /// BUY_CANDIDATE with valid entry conditions.
    pub fn is_valid_entry(&self) -> bool {
        self.direction == SignalDirection::BuyCandidate && self.confirmed
    }

    /// SELL_CANDIDATE with valid exit conditions.
    pub fn is_valid_exit(&self) -> bool {
        self.direction == SignalDirection::SellCandidate && self.confirmed
    }
}
