//! Bias filters.
//!
//! A filter decides whether a symbol is a BUY_CANDIDATE (bullish) or a
//! SELL_CANDIDATE. Each variant is a different trend gate over the closes.

use std::fmt;

use heikin_core::error::StrategyError;
use heikin_core::traits::Indicator;
use heikin_indicators::{ema_series, Macd, Sma};
use serde::{Deserialize, Serialize};

/// Filter result at the last bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasReading {
    /// Bias is BUY_CANDIDATE
    pub bullish: bool,
    /// Value the price (or fast line) was compared against
    pub reference: f64,
}

/// Trend gate deciding the signal's bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BiasFilter {
    /// Bullish when the current price is above the EMA.
    PriceAboveEma { period: usize },
    /// Bullish when the fast EMA is above the slow EMA.
    EmaCross { fast: usize, slow: usize },
    /// Bullish when the fast SMA is above the slow SMA.
    SmaCross { fast: usize, slow: usize },
    /// Bullish when the MACD line is above its signal line and the price is
    /// above the long SMA.
    MacdTrend {
        fast: usize,
        slow: usize,
        signal: usize,
        ma_period: usize,
    },
}

impl Default for BiasFilter {
    fn default() -> Self {
        BiasFilter::PriceAboveEma { period: 20 }
    }
}

impl BiasFilter {
    /// Bars needed before the filter is defined at the last bar.
    pub fn warmup(&self) -> usize {
        match *self {
            BiasFilter::PriceAboveEma { period } => period,
            BiasFilter::EmaCross { fast, slow } | BiasFilter::SmaCross { fast, slow } => {
                fast.max(slow)
            }
            BiasFilter::MacdTrend {
                fast,
                slow,
                signal,
                ma_period,
            } => Macd::with_periods(fast, slow, signal)
                .period()
                .max(ma_period),
        }
    }

    pub fn validate(&self) -> Result<(), StrategyError> {
        match *self {
            BiasFilter::PriceAboveEma { period } => {
                if period == 0 {
                    return Err(StrategyError::InvalidConfig(
                        "EMA period must be greater than 0".into(),
                    ));
                }
            }
            BiasFilter::EmaCross { fast, slow } | BiasFilter::SmaCross { fast, slow } => {
                if fast == 0 {
                    return Err(StrategyError::InvalidConfig(
                        "Fast period must be greater than 0".into(),
                    ));
                }
                if fast >= slow {
                    return Err(StrategyError::InvalidConfig(
                        "Fast period must be less than slow period".into(),
                    ));
                }
            }
            BiasFilter::MacdTrend {
                fast,
                slow,
                signal,
                ma_period,
            } => {
                if fast == 0 || signal == 0 || ma_period == 0 {
                    return Err(StrategyError::InvalidConfig(
                        "MACD periods must be greater than 0".into(),
                    ));
                }
                if fast >= slow {
                    return Err(StrategyError::InvalidConfig(
                        "MACD fast period must be less than slow period".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Evaluate the filter at the last close. `None` when any input series
    /// is still undefined there.
    pub fn evaluate(&self, closes: &[f64], price: f64) -> Option<BiasReading> {
        match *self {
            BiasFilter::PriceAboveEma { period } => {
                let ema = ema_series(closes, period).pop().flatten()?;
                Some(BiasReading {
                    bullish: price > ema,
                    reference: ema,
                })
            }
            BiasFilter::EmaCross { fast, slow } => {
                let fast = ema_series(closes, fast).pop().flatten()?;
                let slow = ema_series(closes, slow).pop().flatten()?;
                Some(BiasReading {
                    bullish: fast > slow,
                    reference: slow,
                })
            }
            BiasFilter::SmaCross { fast, slow } => {
                let fast = Sma::new(fast).last(closes)?;
                let slow = Sma::new(slow).last(closes)?;
                Some(BiasReading {
                    bullish: fast > slow,
                    reference: slow,
                })
            }
            BiasFilter::MacdTrend {
                fast,
                slow,
                signal,
                ma_period,
            } => {
                let macd = Macd::with_periods(fast, slow, signal).last(closes)?;
                let ma = Sma::new(ma_period).last(closes)?;
                Some(BiasReading {
                    bullish: macd.macd > macd.signal && price > ma,
                    reference: ma,
                })
            }
        }
    }
}

impl fmt::Display for BiasFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BiasFilter::PriceAboveEma { period } => write!(f, "price > EMA({period})"),
            BiasFilter::EmaCross { fast, slow } => write!(f, "EMA({fast}) > EMA({slow})"),
            BiasFilter::SmaCross { fast, slow } => write!(f, "SMA({fast}) > SMA({slow})"),
            BiasFilter::MacdTrend {
                fast,
                slow,
                signal,
                ma_period,
            } => write!(
                f,
                "MACD({fast},{slow},{signal}) > signal and price > SMA({ma_period})"
            ),
        }
    }
}
