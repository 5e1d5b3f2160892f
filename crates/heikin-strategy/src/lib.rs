//! Heikin-Ashi signal strategy.
//!
//! The pipeline, leaves first:
//! - Bar classification (BULL / BEAR / INDECISIVE from wick structure)
//! - Trend analysis over a window of labels
//! - Bias filters (EMA, EMA/SMA crossover, MACD + long MA)
//! - The signal engine combining the above into one `Signal` per symbol
//! - A registry of named configuration presets

mod classifier;
mod filter;
mod heikin_ashi;
mod registry;
mod trend;

pub use classifier::{classify, label_bars};
pub use filter::{BiasFilter, BiasReading};
pub use heikin_ashi::{CandleAnalysis, HeikinAshiConfig, HeikinAshiStrategy};
pub use registry::{StrategyInfo, StrategyRegistry, DEFAULT_PRESET};
pub use trend::{analyze_trend, TrendCounts};
