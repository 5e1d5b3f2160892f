//! Broker-owned account and position snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A position in a single security, as last reported by the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol
    pub symbol: String,
    /// Number of shares (positive for long)
    pub quantity: Decimal,
    /// Average entry price
    pub avg_entry_price: Decimal,
}

impl Position {
    /// Create a new position.
    pub fn new(symbol: impl Into<String>, quantity: Decimal, avg_entry_price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            avg_entry_price,
        }
    }

    /// Check if the position is flat (no shares).
    pub fn is_flat(&self) -> bool {
        self.quantity == Decimal::ZERO
    }
}

/// Account balances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Available cash
    pub cash: Decimal,
    /// Total equity (cash + market value of positions)
    pub equity: Decimal,
    /// Buying power (may differ from cash due to margin)
    pub buying_power: Decimal,
}

impl Account {
    /// Cash-only account.
    pub fn with_cash(cash: Decimal) -> Self {
        Self {
            cash,
            equity: cash,
            buying_power: cash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_flat_position() {
        assert!(Position::new("AAPL", dec!(0), dec!(150)).is_flat());
        assert!(!Position::new("AAPL", dec!(3), dec!(150)).is_flat());
    }

    #[test]
    fn test_cash_account() {
        let account = Account::with_cash(dec!(1000));
        assert_eq!(account.equity, dec!(1000));
        assert_eq!(account.buying_power, dec!(1000));
    }
}
