//! Dry-run wrapper: real reads, logged orders.

use async_trait::async_trait;
use heikin_core::error::BrokerError;
use heikin_core::traits::Broker;
use heikin_core::types::{Account, MarketClock, OrderAck, OrderAction, Position};
use tracing::info;

/// Forwards every read to the inner broker and logs orders instead of
/// submitting them.
pub struct DryRunBroker<B> {
    inner: B,
}

impl<B: Broker> DryRunBroker<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: Broker> Broker for DryRunBroker<B> {
    async fn get_account(&self) -> Result<Account, BrokerError> {
        self.inner.get_account().await
    }

    async fn get_positions(&self) -> Result<Vec<Position>, BrokerError> {
        self.inner.get_positions().await
    }

    async fn get_position(&self, symbol: &str) -> Result<Option<Position>, BrokerError> {
        self.inner.get_position(symbol).await
    }

    async fn submit_order(&self, action: &OrderAction) -> Result<OrderAck, BrokerError> {
        info!(broker = self.inner.name(), "Dry run, not submitting: {}", action);
        Ok(OrderAck {
            order_id: "dry-run".to_string(),
            symbol: action.symbol.clone(),
            status: "not_submitted".to_string(),
        })
    }

    async fn market_clock(&self) -> Result<MarketClock, BrokerError> {
        self.inner.market_clock().await
    }

    async fn tradable_symbols(&self, exchange: &str) -> Result<Vec<String>, BrokerError> {
        self.inner.tradable_symbols(exchange).await
    }

    fn name(&self) -> &str {
        "Dry Run"
    }
}
