//! Strategy trait definitions.

use crate::error::StrategyError;
use crate::types::{Bar, Signal};

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Stateless signal strategy.
///
/// Every call recomputes the signal from the supplied history; nothing is
/// carried between cycles.
pub trait Strategy: Send + Sync {
    /// Get the unique name of this strategy.
    fn name(&self) -> &str;

    /// Compute the signal for `symbol` from its bar history and current price.
    ///
    /// # Returns
    /// * `Ok(Signal)` when the history is long enough to define every input
    /// * `Err(StrategyError::InsufficientData)` otherwise; the caller skips
    ///   the symbol for this cycle
    fn evaluate(&self, symbol: &str, bars: &[Bar], price: f64) -> Result<Signal, StrategyError>;

    /// Minimum number of bars needed before a signal can be produced.
    fn warmup_period(&self) -> usize;

    /// Check if the strategy has enough data.
    fn is_warmed_up(&self, bars_available: usize) -> bool {
        bars_available >= self.warmup_period()
    }

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedWarmup(usize);

    impl Strategy for FixedWarmup {
        fn name(&self) -> &str {
            "fixed"
        }

        fn evaluate(&self, _symbol: &str, bars: &[Bar], _price: f64) -> Result<Signal, StrategyError> {
            Err(StrategyError::InsufficientData {
                required: self.0,
                available: bars.len(),
            })
        }

        fn warmup_period(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn test_strategy_warmup() {
        let strategy = FixedWarmup(40);

        assert!(!strategy.is_warmed_up(10));
        assert!(!strategy.is_warmed_up(39));
        assert!(strategy.is_warmed_up(40));
        assert!(strategy.is_warmed_up(100));
    }
}
