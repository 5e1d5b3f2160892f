//! Core data types for the signal bot.

mod candle;
mod clock;
mod ohlcv;
mod order;
mod position;
mod signal;
mod timeframe;

pub use candle::{BarType, HeikinAshiBar, TrendVerdict};
pub use clock::MarketClock;
pub use ohlcv::{normalize_bars, Bar};
pub use order::{OrderAck, OrderAction, Side};
pub use position::{Account, Position};
pub use signal::{Signal, SignalDirection};
pub use timeframe::Timeframe;
