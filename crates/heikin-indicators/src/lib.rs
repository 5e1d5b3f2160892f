//! Candle transforms and technical indicators.
//!
//! This crate provides:
//! - The Heikin-Ashi candle transform
//! - Moving averages (SMA, EMA) with output aligned to the input series
//! - MACD built on the same EMA, and RSI
//!
//! Indicator output has one entry per input point; entries before the
//! indicator's warmup are `None`.

pub mod heikin_ashi;
pub mod momentum;
pub mod moving_average;

pub use heikin_ashi::heikin_ashi;
pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{ema_series, Ema, Sma};
