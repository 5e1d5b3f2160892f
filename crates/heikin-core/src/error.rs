//! Error types for the signal bot.

use thiserror::Error;

/// Strategy-specific errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Strategy not found: {0}")]
    NotFound(String),
}

impl From<IndicatorError> for StrategyError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData {
                required,
                available,
            } => StrategyError::InsufficientData {
                required,
                available,
            },
            IndicatorError::InvalidParameter(msg) => StrategyError::InvalidConfig(msg),
        }
    }
}

/// Broker-specific errors.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Order rejected: {0}")]
    OrderRejected(String),

    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("API error: {0}")]
    ApiError(String),
}

impl BrokerError {
    /// Whether the failure is a transport/availability problem that may clear
    /// up on the next cycle.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BrokerError::Connection(_) | BrokerError::RateLimited { .. }
        )
    }
}

/// Market data errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Indicator and candle transform errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Risk sizing errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Invalid price: {0}")]
    InvalidPrice(rust_decimal::Decimal),

    #[error("Price not representable: {0}")]
    Unrepresentable(f64),

    #[error("Invalid risk configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(BrokerError::Connection("timeout".into()).is_transient());
        assert!(BrokerError::RateLimited { retry_after_secs: 3 }.is_transient());
        assert!(!BrokerError::OrderRejected("not tradable".into()).is_transient());
    }

    #[test]
    fn test_indicator_error_conversion() {
        let err: StrategyError = IndicatorError::InsufficientData {
            required: 1,
            available: 0,
        }
        .into();
        assert_eq!(
            err,
            StrategyError::InsufficientData {
                required: 1,
                available: 0
            }
        );

        let err: StrategyError = IndicatorError::InvalidParameter("period".into()).into();
        assert!(matches!(err, StrategyError::InvalidConfig(_)));
    }
}
