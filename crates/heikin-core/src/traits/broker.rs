//! Broker trait definition.

use crate::error::BrokerError;
use crate::types::{Account, MarketClock, OrderAck, OrderAction, Position};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for broker integrations.
///
/// The broker owns account and position state. Callers re-read it on every
/// evaluation and never cache it.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Get account balances.
    async fn get_account(&self) -> Result<Account, BrokerError>;

    /// Get the available cash.
    async fn get_account_cash(&self) -> Result<Decimal, BrokerError> {
        let account = self.get_account().await?;
        Ok(account.cash)
    }

    /// Get all open positions.
    async fn get_positions(&self) -> Result<Vec<Position>, BrokerError>;

    /// Get position for a specific symbol.
    ///
    /// # Returns
    /// The position if one exists, None otherwise. A missing position is not
    /// an error.
    async fn get_position(&self, symbol: &str) -> Result<Option<Position>, BrokerError>;

    /// Submit an order. Fire-and-forget: the acknowledgement is logged,
    /// the order is not tracked further.
    async fn submit_order(&self, action: &OrderAction) -> Result<OrderAck, BrokerError>;

    /// Current market session state.
    async fn market_clock(&self) -> Result<MarketClock, BrokerError>;

    /// Active, tradable symbols listed on an exchange.
    async fn tradable_symbols(&self, exchange: &str) -> Result<Vec<String>, BrokerError>;

    /// Get the broker name.
    fn name(&self) -> &str;
}
