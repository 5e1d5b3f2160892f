//! Combined sizing and exit rules.

use heikin_core::error::RiskError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{ExitGuard, ExitTrigger, PositionSizer, SizeRounding};

/// Risk configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Fraction of available cash committed to a new position
    pub risk_fraction: Decimal,
    /// Gain over entry that forces a sale
    pub profit_margin: Decimal,
    /// Loss under entry that forces a sale
    pub loss_margin: Decimal,
    /// Share count rounding
    pub rounding: SizeRounding,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_fraction: dec!(0.1),
            profit_margin: dec!(0.03),
            loss_margin: dec!(0.02),
            rounding: SizeRounding::Up,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.risk_fraction <= Decimal::ZERO || self.risk_fraction > Decimal::ONE {
            return Err(RiskError::InvalidConfig(format!(
                "risk_fraction must be in (0, 1], got {}",
                self.risk_fraction
            )));
        }
        if self.profit_margin <= Decimal::ZERO {
            return Err(RiskError::InvalidConfig(format!(
                "profit_margin must be positive, got {}",
                self.profit_margin
            )));
        }
        if self.loss_margin <= Decimal::ZERO || self.loss_margin >= Decimal::ONE {
            return Err(RiskError::InvalidConfig(format!(
                "loss_margin must be in (0, 1), got {}",
                self.loss_margin
            )));
        }
        Ok(())
    }
}

/// Order sizing plus emergency exits.
#[derive(Debug, Clone)]
pub struct RiskSizer {
    sizer: PositionSizer,
    guard: ExitGuard,
}

impl RiskSizer {
    pub fn new(config: &RiskConfig) -> Self {
        Self {
            sizer: PositionSizer::new(config.risk_fraction).with_rounding(config.rounding),
            guard: ExitGuard::new(config.profit_margin, config.loss_margin),
        }
    }

    /// Shares to buy with `cash` at `price`.
    pub fn shares_to_buy(&self, cash: Decimal, price: Decimal) -> Result<Decimal, RiskError> {
        self.sizer.shares_to_buy(cash, price)
    }

    /// Emergency exit for a position entered at `entry_price`.
    pub fn emergency_exit(&self, entry_price: Decimal, current_price: Decimal) -> Option<ExitTrigger> {
        self.guard.check(entry_price, current_price)
    }
}

impl Default for RiskSizer {
    fn default() -> Self {
        Self::new(&RiskConfig::default())
    }
}
