//! Position sizing.

use heikin_core::error::RiskError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How fractional share counts are rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeRounding {
    /// Round up; a nonzero budget always buys at least one share.
    #[default]
    Up,
    /// Round down; never spends more than the budget.
    Down,
}

/// Sizes new positions as a fraction of available cash.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    risk_fraction: Decimal,
    rounding: SizeRounding,
}

impl PositionSizer {
    /// Create a new position sizer.
    pub fn new(risk_fraction: Decimal) -> Self {
        Self {
            risk_fraction,
            rounding: SizeRounding::Up,
        }
    }

    /// Set the rounding mode.
    pub fn with_rounding(mut self, rounding: SizeRounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn risk_fraction(&self) -> Decimal {
        self.risk_fraction
    }

    /// Whole shares to buy: `round(cash * risk_fraction / price)`.
    ///
    /// Non-positive cash sizes to zero.
    pub fn shares_to_buy(&self, cash: Decimal, price: Decimal) -> Result<Decimal, RiskError> {
        if price <= Decimal::ZERO {
            return Err(RiskError::InvalidPrice(price));
        }

        let raw = cash * self.risk_fraction / price;
        let shares = match self.rounding {
            SizeRounding::Up => raw.ceil(),
            SizeRounding::Down => raw.floor(),
        };

        Ok(shares.max(Decimal::ZERO))
    }
}

impl Default for PositionSizer {
    fn default() -> Self {
        Self::new(dec!(0.1))
    }
}

/// Convert a feed price to a `Decimal`.
pub fn to_decimal_price(price: f64) -> Result<Decimal, RiskError> {
    Decimal::try_from(price).map_err(|_| RiskError::Unrepresentable(price))
}
