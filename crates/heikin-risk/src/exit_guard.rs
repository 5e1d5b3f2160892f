//! Emergency take-profit / stop-loss exits.
//!
//! Evaluated against the entry price of a held position before any signal
//! logic. A trigger forces a sale of the full quantity.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Why an emergency exit fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExitTrigger {
    /// Price rose past the profit margin
    Profit,
    /// Price fell past the loss margin
    Loss,
}

impl fmt::Display for ExitTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitTrigger::Profit => write!(f, "PROFIT"),
            ExitTrigger::Loss => write!(f, "LOSS"),
        }
    }
}

/// Margin-based exit check.
#[derive(Debug, Clone)]
pub struct ExitGuard {
    profit_margin: Decimal,
    loss_margin: Decimal,
}

impl ExitGuard {
    pub fn new(profit_margin: Decimal, loss_margin: Decimal) -> Self {
        Self {
            profit_margin,
            loss_margin,
        }
    }

    /// `Profit` when `current > entry * (1 + profit_margin)`, `Loss` when
    /// `current < entry * (1 - loss_margin)`, otherwise `None`.
    pub fn check(&self, entry_price: Decimal, current_price: Decimal) -> Option<ExitTrigger> {
        if current_price > entry_price * (Decimal::ONE + self.profit_margin) {
            Some(ExitTrigger::Profit)
        } else if current_price < entry_price * (Decimal::ONE - self.loss_margin) {
            Some(ExitTrigger::Loss)
        } else {
            None
        }
    }
}

impl Default for ExitGuard {
    fn default() -> Self {
        Self::new(dec!(0.03), dec!(0.02))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_and_loss() {
        let guard = ExitGuard::default();

        assert_eq!(guard.check(dec!(100), dec!(104)), Some(ExitTrigger::Profit));
        assert_eq!(guard.check(dec!(100), dec!(103.5)), Some(ExitTrigger::Profit));
        assert_eq!(guard.check(dec!(100), dec!(97)), Some(ExitTrigger::Loss));
        assert_eq!(guard.check(dec!(100), dec!(101)), None);
    }

    #[test]
    fn test_boundaries_are_strict() {
        let guard = ExitGuard::default();

        assert_eq!(guard.check(dec!(100), dec!(103)), None);
        assert_eq!(guard.check(dec!(100), dec!(98)), None);
        assert_eq!(guard.check(dec!(100), dec!(103.01)), Some(ExitTrigger::Profit));
        assert_eq!(guard.check(dec!(100), dec!(97.99)), Some(ExitTrigger::Loss));
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitTrigger::Profit.to_string(), "PROFIT");
        assert_eq!(ExitTrigger::Loss.to_string(), "LOSS");
    }
}
