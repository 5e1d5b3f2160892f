//! Core types and traits for the Heikin-Ashi bot.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, HeikinAshiBar, bar labels and trend verdicts)
//! - Order, position and market clock types
//! - Per-cycle signals
//! - Core traits for strategies, indicators, brokers, and market data

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
