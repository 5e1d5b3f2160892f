//! Core traits for the signal bot.

mod broker;
mod data_source;
mod indicator;
mod strategy;

pub use broker::Broker;
pub use data_source::{MarketData, Quote};
pub use indicator::Indicator;
pub use strategy::{Strategy, StrategyConfig};
