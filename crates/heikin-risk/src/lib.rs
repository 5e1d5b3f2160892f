//! Risk management for the Heikin-Ashi bot.
//!
//! Provides cash-fraction order sizing and the take-profit / stop-loss
//! emergency exit override.

mod exit_guard;
mod position_sizer;
mod risk_manager;

pub use exit_guard::{ExitGuard, ExitTrigger};
pub use position_sizer::{to_decimal_price, PositionSizer, SizeRounding};
pub use risk_manager::{RiskConfig, RiskSizer};
