//! In-memory paper broker for simulation and tests.
//!
//! Holds an account, positions, bar histories and prices, fills market
//! orders immediately at the current price and records every submitted
//! order. The market clock is either fixed or a scripted cycle of open and
//! closed phases measured on the tokio clock, so a paused runtime can drive
//! whole sessions deterministically.

use async_trait::async_trait;
use heikin_core::error::{BrokerError, DataError};
use heikin_core::traits::{Broker, MarketData};
use heikin_core::types::{
    Account, Bar, MarketClock, OrderAck, OrderAction, Position, Side, Timeframe,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

/// One phase of a scripted market session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPhase {
    pub open: bool,
    pub duration: Duration,
}

impl SessionPhase {
    pub fn open(duration: Duration) -> Self {
        Self {
            open: true,
            duration,
        }
    }

    pub fn closed(duration: Duration) -> Self {
        Self {
            open: false,
            duration,
        }
    }
}

/// Repeating open/closed schedule anchored at a tokio instant.
#[derive(Debug, Clone)]
struct SessionScript {
    start: Instant,
    phases: Vec<SessionPhase>,
}

impl SessionScript {
    fn clock_at(&self, now: Instant) -> MarketClock {
        let cycle: Duration = self.phases.iter().map(|p| p.duration).sum();
        if cycle.is_zero() {
            return MarketClock::closed(0, 0);
        }

        let cycle_ns = cycle.as_nanos();
        let pos = Duration::from_nanos((now.duration_since(self.start).as_nanos() % cycle_ns) as u64);

        // Locate the current phase and the time left in it
        let mut offset = Duration::ZERO;
        let mut current = 0;
        for (i, phase) in self.phases.iter().enumerate() {
            if pos < offset + phase.duration {
                current = i;
                break;
            }
            offset += phase.duration;
        }
        let remaining = offset + self.phases[current].duration - pos;

        let to_close = self.until_transition(current, remaining, false);
        let to_open = self.until_transition(current, remaining, true);
        if self.phases[current].open {
            MarketClock::open(to_close.as_secs(), to_open.as_secs())
        } else {
            MarketClock::closed(to_open.as_secs(), to_close.as_secs())
        }
    }

    /// Time until the schedule next switches into the `open` state.
    fn until_transition(&self, current: usize, remaining: Duration, open: bool) -> Duration {
        let n = self.phases.len();
        let mut t = remaining;
        for k in 1..=n {
            let j = (current + k) % n;
            let prev = (j + n - 1) % n;
            if self.phases[j].open == open && self.phases[prev].open != open {
                return t;
            }
            t += self.phases[j].duration;
        }
        t
    }
}

#[derive(Debug, Default)]
struct PaperState {
    account: Account,
    positions: BTreeMap<String, Position>,
    bars: HashMap<String, Vec<Bar>>,
    prices: HashMap<String, f64>,
    listings: Vec<(String, String)>,
    orders: Vec<OrderAction>,
    rejected_symbols: HashSet<String>,
    feed_failures: HashSet<String>,
    position_failures: HashSet<String>,
    account_failure: bool,
    clock_retry_after: Option<u64>,
    clock: Option<MarketClock>,
    session: Option<SessionScript>,
}

impl PaperState {
    fn price_of(&self, symbol: &str) -> Option<f64> {
        self.prices
            .get(symbol)
            .copied()
            .or_else(|| self.bars.get(symbol).and_then(|b| b.last()).map(|b| b.close))
    }

    fn fill(&mut self, action: &OrderAction, price: Decimal) {
        let value = action.quantity * price;
        match action.side {
            Side::Buy => {
                self.account.cash -= value;
                let position = self
                    .positions
                    .entry(action.symbol.clone())
                    .or_insert_with(|| Position::new(action.symbol.clone(), Decimal::ZERO, price));
                let total = position.quantity + action.quantity;
                if !total.is_zero() {
                    position.avg_entry_price = (position.avg_entry_price * position.quantity
                        + value)
                        / total;
                }
                position.quantity = total;
            }
            Side::Sell => {
                self.account.cash += value;
                if let Some(position) = self.positions.get_mut(&action.symbol) {
                    position.quantity -= action.quantity;
                    if position.is_flat() {
                        self.positions.remove(&action.symbol);
                    }
                }
            }
        }
    }
}

/// Paper trading broker and market data source.
#[derive(Debug, Default)]
pub struct PaperBroker {
    state: Mutex<PaperState>,
}

impl PaperBroker {
    /// Create a paper broker with starting cash and an open market.
    pub fn new(cash: Decimal) -> Self {
        let broker = Self::default();
        {
            let mut state = broker.state();
            state.account = Account::with_cash(cash);
            state.clock = Some(MarketClock::open(6 * 3600, 18 * 3600));
        }
        broker
    }

    fn state(&self) -> MutexGuard<'_, PaperState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fix the market clock.
    pub fn set_clock(&self, clock: MarketClock) {
        let mut state = self.state();
        state.clock = Some(clock);
        state.session = None;
    }

    /// Run a repeating session script starting now on the tokio clock.
    pub fn set_session(&self, phases: Vec<SessionPhase>) {
        let mut state = self.state();
        state.session = Some(SessionScript {
            start: Instant::now(),
            phases,
        });
    }

    pub fn set_cash(&self, cash: Decimal) {
        self.state().account.cash = cash;
    }

    pub fn set_position(&self, symbol: &str, quantity: Decimal, avg_entry_price: Decimal) {
        self.state().positions.insert(
            symbol.to_string(),
            Position::new(symbol, quantity, avg_entry_price),
        );
    }

    pub fn set_bars(&self, symbol: &str, bars: Vec<Bar>) {
        self.state().bars.insert(symbol.to_string(), bars);
    }

    pub fn set_price(&self, symbol: &str, price: f64) {
        self.state().prices.insert(symbol.to_string(), price);
    }

    /// List a symbol as tradable on an exchange.
    pub fn list_symbol(&self, exchange: &str, symbol: &str) {
        self.state()
            .listings
            .push((exchange.to_string(), symbol.to_string()));
    }

    /// Reject every order for `symbol`.
    pub fn reject_orders(&self, symbol: &str) {
        self.state().rejected_symbols.insert(symbol.to_string());
    }

    /// Fail data requests for `symbol` with a connection error.
    pub fn fail_feed(&self, symbol: &str, failing: bool) {
        let mut state = self.state();
        if failing {
            state.feed_failures.insert(symbol.to_string());
        } else {
            state.feed_failures.remove(symbol);
        }
    }

    /// Fail position lookups for `symbol`.
    pub fn fail_position_lookup(&self, symbol: &str) {
        self.state().position_failures.insert(symbol.to_string());
    }

    /// Rate-limit clock reads, asking callers to retry after the given
    /// number of seconds. `None` lifts the limit.
    pub fn rate_limit_clock(&self, retry_after_secs: Option<u64>) {
        self.state().clock_retry_after = retry_after_secs;
    }

    /// Fail account reads with a connection error.
    pub fn fail_account(&self, failing: bool) {
        self.state().account_failure = failing;
    }

    /// Orders submitted so far, including rejected ones.
    pub fn orders(&self) -> Vec<OrderAction> {
        self.state().orders.clone()
    }

    pub fn cash(&self) -> Decimal {
        self.state().account.cash
    }
}

#[async_trait]
impl Broker for PaperBroker {
    async fn get_account(&self) -> Result<Account, BrokerError> {
        let state = self.state();
        if state.account_failure {
            return Err(BrokerError::Connection("account endpoint down".into()));
        }
        Ok(state.account.clone())
    }

    async fn get_positions(&self) -> Result<Vec<Position>, BrokerError> {
        Ok(self.state().positions.values().cloned().collect())
    }

    async fn get_position(&self, symbol: &str) -> Result<Option<Position>, BrokerError> {
        let state = self.state();
        if state.position_failures.contains(symbol) {
            return Err(BrokerError::Connection(format!(
                "position lookup failed for {symbol}"
            )));
        }
        Ok(state.positions.get(symbol).cloned())
    }

    async fn submit_order(&self, action: &OrderAction) -> Result<OrderAck, BrokerError> {
        let mut state = self.state();
        state.orders.push(action.clone());

        if state.rejected_symbols.contains(&action.symbol) {
            return Err(BrokerError::OrderRejected(format!(
                "{} is not tradable",
                action.symbol
            )));
        }

        let price = state
            .price_of(&action.symbol)
            .and_then(|p| Decimal::try_from(p).ok())
            .ok_or_else(|| BrokerError::OrderRejected(format!("no price for {}", action.symbol)))?;
        state.fill(action, price);

        debug!("Paper fill: {} @ {}", action, price);
        Ok(OrderAck {
            order_id: Uuid::new_v4().to_string(),
            symbol: action.symbol.clone(),
            status: "filled".to_string(),
        })
    }

    async fn market_clock(&self) -> Result<MarketClock, BrokerError> {
        let state = self.state();
        if let Some(retry_after_secs) = state.clock_retry_after {
            return Err(BrokerError::RateLimited { retry_after_secs });
        }
        if let Some(session) = &state.session {
            return Ok(session.clock_at(Instant::now()));
        }
        state
            .clock
            .ok_or_else(|| BrokerError::Configuration("market clock not set".into()))
    }

    async fn tradable_symbols(&self, exchange: &str) -> Result<Vec<String>, BrokerError> {
        let mut symbols: Vec<String> = self
            .state()
            .listings
            .iter()
            .filter(|(ex, _)| ex.eq_ignore_ascii_case(exchange))
            .map(|(_, symbol)| symbol.clone())
            .collect();
        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    fn name(&self) -> &str {
        "Paper"
    }
}

#[async_trait]
impl MarketData for PaperBroker {
    async fn get_bars(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let state = self.state();
        if state.feed_failures.contains(symbol) {
            return Err(DataError::ConnectionError(format!("feed down for {symbol}")));
        }
        let bars = state.bars.get(symbol).map(Vec::as_slice).unwrap_or_default();
        Ok(bars[bars.len().saturating_sub(lookback)..].to_vec())
    }

    async fn get_current_price(&self, symbol: &str) -> Result<Option<f64>, DataError> {
        let state = self.state();
        if state.feed_failures.contains(symbol) {
            return Err(DataError::ConnectionError(format!("feed down for {symbol}")));
        }
        Ok(state.price_of(symbol))
    }

    fn name(&self) -> &str {
        "Paper"
    }
}
