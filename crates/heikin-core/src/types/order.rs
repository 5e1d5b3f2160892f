//! Order actions handed to the broker.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Terminal output of one symbol evaluation.
///
/// Submitted fire-and-forget; the bot does not track the order afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAction {
    /// Symbol to trade
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Whole shares
    pub quantity: Decimal,
    /// Protective stop attached to entries
    pub stop_loss_price: Option<Decimal>,
}

impl OrderAction {
    /// Market buy, optionally protected by a stop.
    pub fn buy(symbol: impl Into<String>, quantity: Decimal, stop_loss_price: Option<Decimal>) -> Self {
        Self {
            symbol: symbol.into(),
            side: Side::Buy,
            quantity,
            stop_loss_price,
        }
    }

    /// Market sell.
    pub fn sell(symbol: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side: Side::Sell,
            quantity,
            stop_loss_price: None,
        }
    }
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.side, self.quantity, self.symbol)?;
        if let Some(stop) = self.stop_loss_price {
            write!(f, " (stop {})", stop)?;
        }
        Ok(())
    }
}

/// Broker acknowledgement of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    /// Broker-assigned order ID
    pub order_id: String,
    /// Symbol
    pub symbol: String,
    /// Status string as reported by the broker
    pub status: String,
}
