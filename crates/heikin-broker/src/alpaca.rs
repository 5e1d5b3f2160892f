//! Alpaca REST integration for paper and live trading.
//!
//! Implements both [`Broker`] (trading API) and [`MarketData`] (data API)
//! over one authenticated HTTP client.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use heikin_core::error::{BrokerError, DataError};
use heikin_core::traits::{Broker, MarketData, Quote};
use heikin_core::types::{
    normalize_bars, Account, Bar, MarketClock, OrderAck, OrderAction, Position, Side, Timeframe,
};
use reqwest::{header, Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Alpaca API configuration.
#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub api_secret: String,
    pub paper: bool,
    /// Market data feed (`iex` or `sip`)
    pub data_feed: String,
    /// Order time in force
    pub time_in_force: String,
}

impl AlpacaConfig {
    /// Create config directly with key and secret.
    pub fn new(api_key: String, api_secret: String, paper: bool) -> Self {
        Self {
            api_key,
            api_secret,
            paper,
            data_feed: "iex".to_string(),
            time_in_force: "gtc".to_string(),
        }
    }

    /// Read credentials from the named environment variables.
    pub fn from_env(key_var: &str, secret_var: &str, paper: bool) -> Result<Self, BrokerError> {
        let api_key = std::env::var(key_var)
            .map_err(|_| BrokerError::Configuration(format!("{key_var} not set")))?;
        let api_secret = std::env::var(secret_var)
            .map_err(|_| BrokerError::Configuration(format!("{secret_var} not set")))?;
        Ok(Self::new(api_key, api_secret, paper))
    }

    pub fn with_data_feed(mut self, feed: impl Into<String>) -> Self {
        self.data_feed = feed.into();
        self
    }

    pub fn with_time_in_force(mut self, tif: impl Into<String>) -> Self {
        self.time_in_force = tif.into();
        self
    }

    pub fn base_url(&self) -> &str {
        if self.paper {
            "https://paper-api.alpaca.markets"
        } else {
            "https://api.alpaca.markets"
        }
    }

    pub fn data_url(&self) -> &str {
        "https://data.alpaca.markets"
    }
}

// Alpaca API response types. Unknown fields are ignored.

#[derive(Debug, Deserialize)]
struct AlpacaAccount {
    cash: String,
    equity: String,
    buying_power: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaPosition {
    symbol: String,
    qty: String,
    avg_entry_price: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    symbol: String,
    status: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct StopLoss {
    stop_price: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct CreateOrderRequest {
    symbol: String,
    qty: String,
    side: String,
    #[serde(rename = "type")]
    order_type: String,
    time_in_force: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_loss: Option<StopLoss>,
}

impl CreateOrderRequest {
    /// Market order; a BUY carrying a stop becomes a one-triggers-other
    /// order whose stop leg is rounded to cents.
    fn from_action(action: &OrderAction, time_in_force: &str) -> Self {
        let stop_loss = match (action.side, action.stop_loss_price) {
            (Side::Buy, Some(stop)) => Some(StopLoss {
                stop_price: stop.round_dp(2).to_string(),
            }),
            _ => None,
        };

        Self {
            symbol: action.symbol.clone(),
            qty: action.quantity.normalize().to_string(),
            side: action.side.as_str().to_string(),
            order_type: "market".to_string(),
            time_in_force: time_in_force.to_string(),
            order_class: stop_loss.as_ref().map(|_| "oto".to_string()),
            stop_loss,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AlpacaClock {
    timestamp: DateTime<Utc>,
    is_open: bool,
    next_open: DateTime<Utc>,
    next_close: DateTime<Utc>,
}

impl AlpacaClock {
    fn to_market_clock(&self) -> MarketClock {
        let secs = |to: DateTime<Utc>| (to - self.timestamp).num_seconds().max(0) as u64;
        MarketClock {
            is_open: self.is_open,
            seconds_to_close: secs(self.next_close),
            seconds_to_open: secs(self.next_open),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AlpacaAsset {
    symbol: String,
    exchange: String,
    tradable: bool,
}

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    t: DateTime<Utc>,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

#[derive(Debug, Deserialize)]
struct AlpacaBarsResponse {
    #[serde(default)]
    bars: Option<Vec<AlpacaBar>>,
}

impl AlpacaBarsResponse {
    /// Oldest first, unique by timestamp.
    fn into_bars(self) -> Vec<Bar> {
        let mut bars: Vec<Bar> = self
            .bars
            .unwrap_or_default()
            .into_iter()
            .map(|b| Bar::new(b.t.timestamp_millis(), b.o, b.h, b.l, b.c, b.v))
            .collect();
        normalize_bars(&mut bars);
        bars
    }
}

#[derive(Debug, Deserialize)]
struct AlpacaTrade {
    p: f64,
}

#[derive(Debug, Deserialize)]
struct AlpacaLatestTradeResponse {
    trade: Option<AlpacaTrade>,
}

#[derive(Debug, Deserialize)]
struct AlpacaQuote {
    bp: f64,
    ap: f64,
    t: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct AlpacaLatestQuoteResponse {
    symbol: String,
    quote: Option<AlpacaQuote>,
}

impl AlpacaLatestQuoteResponse {
    fn into_quote(self) -> Option<Quote> {
        let symbol = self.symbol;
        self.quote.map(|q| Quote {
            symbol,
            bid: q.bp,
            ask: q.ap,
            timestamp: q.t.timestamp_millis(),
        })
    }
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, BrokerError> {
    value
        .parse()
        .map_err(|_| BrokerError::ApiError(format!("invalid {field}: {value:?}")))
}

impl AlpacaPosition {
    fn into_position(self) -> Result<Position, BrokerError> {
        Ok(Position::new(
            self.symbol,
            parse_decimal("qty", &self.qty)?,
            parse_decimal("avg_entry_price", &self.avg_entry_price)?,
        ))
    }
}

/// Map an unsuccessful response to a broker error.
async fn check_status(resp: Response) -> Result<Response, BrokerError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = resp
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        return Err(BrokerError::RateLimited { retry_after_secs });
    }
    let text = resp.text().await.unwrap_or_default();
    Err(BrokerError::ApiError(format!("{}: {}", status, text)))
}

/// Data API failures: missing symbols are not transient, everything else is
/// treated as a feed failure.
fn data_error(symbol: &str, err: BrokerError) -> DataError {
    match err {
        BrokerError::ApiError(msg) if msg.starts_with("404") || msg.starts_with("422") => {
            DataError::SymbolNotFound(symbol.to_string())
        }
        other => DataError::ConnectionError(other.to_string()),
    }
}

/// Alpaca broker and market data client.
pub struct AlpacaBroker {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaBroker {
    /// Create a new Alpaca client.
    pub fn new(config: AlpacaConfig) -> Result<Self, BrokerError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(&config.api_secret)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, BrokerError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;
        let resp = check_status(resp).await?;
        resp.json()
            .await
            .map_err(|e| BrokerError::ApiError(e.to_string()))
    }
}

#[async_trait]
impl Broker for AlpacaBroker {
    async fn get_account(&self) -> Result<Account, BrokerError> {
        let url = format!("{}/v2/account", self.config.base_url());
        let account: AlpacaAccount = self.get_json(&url, &[]).await?;

        Ok(Account {
            cash: parse_decimal("cash", &account.cash)?,
            equity: parse_decimal("equity", &account.equity)?,
            buying_power: parse_decimal("buying_power", &account.buying_power)?,
        })
    }

    async fn get_positions(&self) -> Result<Vec<Position>, BrokerError> {
        let url = format!("{}/v2/positions", self.config.base_url());
        let positions: Vec<AlpacaPosition> = self.get_json(&url, &[]).await?;
        positions
            .into_iter()
            .map(AlpacaPosition::into_position)
            .collect()
    }

    async fn get_position(&self, symbol: &str) -> Result<Option<Position>, BrokerError> {
        let url = format!("{}/v2/positions/{}", self.config.base_url(), symbol);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let resp = check_status(resp).await?;
        let p: AlpacaPosition = resp
            .json()
            .await
            .map_err(|e| BrokerError::ApiError(e.to_string()))?;
        Ok(Some(p.into_position()?))
    }

    async fn submit_order(&self, action: &OrderAction) -> Result<OrderAck, BrokerError> {
        let url = format!("{}/v2/orders", self.config.base_url());
        let request = CreateOrderRequest::from_action(action, &self.config.time_in_force);

        debug!("Submitting order: {:?}", request);

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        let resp = match check_status(resp).await {
            Err(BrokerError::ApiError(msg)) => return Err(BrokerError::OrderRejected(msg)),
            other => other?,
        };

        let order: AlpacaOrder = resp
            .json()
            .await
            .map_err(|e| BrokerError::ApiError(e.to_string()))?;

        info!(order_id = %order.id, status = %order.status, "Order submitted: {}", action);
        Ok(OrderAck {
            order_id: order.id,
            symbol: order.symbol,
            status: order.status,
        })
    }

    async fn market_clock(&self) -> Result<MarketClock, BrokerError> {
        let url = format!("{}/v2/clock", self.config.base_url());
        let clock: AlpacaClock = self.get_json(&url, &[]).await?;
        Ok(clock.to_market_clock())
    }

    async fn tradable_symbols(&self, exchange: &str) -> Result<Vec<String>, BrokerError> {
        let url = format!("{}/v2/assets", self.config.base_url());
        let assets: Vec<AlpacaAsset> = self
            .get_json(&url, &[("status", "active".to_string())])
            .await?;

        let mut symbols: Vec<String> = assets
            .into_iter()
            .filter(|a| a.tradable && a.exchange.eq_ignore_ascii_case(exchange))
            .map(|a| a.symbol)
            .collect();
        symbols.sort();
        Ok(symbols)
    }

    fn name(&self) -> &str {
        if self.config.paper {
            "Alpaca Paper"
        } else {
            "Alpaca Live"
        }
    }
}

#[async_trait]
impl MarketData for AlpacaBroker {
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let url = format!("{}/v2/stocks/{}/bars", self.config.data_url(), symbol);

        // Calendar span generous enough to cover non-trading hours; the
        // newest `lookback` bars are taken from the end of it.
        let factor = if timeframe.is_intraday() { 4 } else { 2 };
        let span = ChronoDuration::seconds(timeframe.as_secs() as i64 * lookback as i64 * factor)
            + ChronoDuration::days(7);
        let start = (Utc::now() - span).to_rfc3339();

        let params = [
            ("timeframe", timeframe.alpaca_str().to_string()),
            ("start", start),
            ("limit", lookback.to_string()),
            ("sort", "desc".to_string()),
            ("feed", self.config.data_feed.clone()),
        ];

        let data: AlpacaBarsResponse = self
            .get_json(&url, &params)
            .await
            .map_err(|e| data_error(symbol, e))?;
        Ok(data.into_bars())
    }

    async fn get_current_price(&self, symbol: &str) -> Result<Option<f64>, DataError> {
        let url = format!(
            "{}/v2/stocks/{}/trades/latest",
            self.config.data_url(),
            symbol
        );
        let feed = [("feed", self.config.data_feed.clone())];
        let data: AlpacaLatestTradeResponse = self
            .get_json(&url, &feed)
            .await
            .map_err(|e| data_error(symbol, e))?;
        if let Some(price) = data.trade.map(|t| t.p).filter(|p| *p > 0.0) {
            return Ok(Some(price));
        }

        // No trade on this feed yet; fall back to the quote
        let url = format!(
            "{}/v2/stocks/{}/quotes/latest",
            self.config.data_url(),
            symbol
        );
        let data: AlpacaLatestQuoteResponse = self
            .get_json(&url, &feed)
            .await
            .map_err(|e| data_error(symbol, e))?;
        Ok(data.into_quote().and_then(|q| q.price()))
    }

    fn name(&self) -> &str {
        "Alpaca Data"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_buy_with_stop_is_oto() {
        let action = OrderAction::buy("AAPL", dec!(5), Some(dec!(95.256)));
        let request = CreateOrderRequest::from_action(&action, "gtc");

        assert_eq!(request.order_class.as_deref(), Some("oto"));
        assert_eq!(
            request.stop_loss,
            Some(StopLoss {
                stop_price: "95.26".to_string()
            })
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "market");
        assert_eq!(json["side"], "buy");
        assert_eq!(json["qty"], "5");
        assert_eq!(json["time_in_force"], "gtc");
        assert_eq!(json["stop_loss"]["stop_price"], "95.26");
    }

    #[test]
    fn test_sell_is_simple_market_order() {
        let action = OrderAction::sell("AAPL", dec!(12));
        let json = serde_json::to_value(CreateOrderRequest::from_action(&action, "day")).unwrap();

        assert_eq!(json["side"], "sell");
        assert!(json.get("order_class").is_none());
        assert!(json.get("stop_loss").is_none());
    }

    #[test]
    fn test_clock_seconds() {
        let clock: AlpacaClock = serde_json::from_str(
            r#"{
                "timestamp": "2024-01-02T15:58:00-05:00",
                "is_open": true,
                "next_open": "2024-01-03T09:30:00-05:00",
                "next_close": "2024-01-02T16:00:00-05:00"
            }"#,
        )
        .unwrap();
        let clock = clock.to_market_clock();

        assert!(clock.is_open);
        assert_eq!(clock.seconds_to_close, 120);
        assert_eq!(clock.seconds_to_open, 63_120);
        assert!(clock.is_closing(120));
    }

    #[test]
    fn test_bars_sorted_and_deduped() {
        let resp: AlpacaBarsResponse = serde_json::from_str(
            r#"{
                "bars": [
                    {"t":"2024-01-03T05:00:00Z","o":3,"h":3,"l":3,"c":3,"v":100,"n":1,"vw":3},
                    {"t":"2024-01-02T05:00:00Z","o":2,"h":2,"l":2,"c":2,"v":100,"n":1,"vw":2},
                    {"t":"2024-01-02T05:00:00Z","o":9,"h":9,"l":9,"c":9,"v":100,"n":1,"vw":9}
                ],
                "symbol": "AAPL",
                "next_page_token": null
            }"#,
        )
        .unwrap();
        let bars = resp.into_bars();

        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert_eq!(bars[0].close, 9.0);
    }

    #[test]
    fn test_empty_bars() {
        let resp: AlpacaBarsResponse =
            serde_json::from_str(r#"{"bars": null, "symbol": "XYZ"}"#).unwrap();
        assert!(resp.into_bars().is_empty());
    }

    #[test]
    fn test_quote_fallback_price() {
        let data: AlpacaLatestQuoteResponse = serde_json::from_str(
            r#"{"symbol": "AAPL", "quote": {"bp": 189.9, "ap": 190.1, "t": "2024-03-01T15:00:00Z"}}"#,
        )
        .unwrap();
        let quote = data.into_quote().unwrap();

        assert_eq!(quote.symbol, "AAPL");
        assert!((quote.price().unwrap() - 190.0).abs() < 1e-9);
    }

    #[test]
    fn test_position_parse() {
        let p: AlpacaPosition = serde_json::from_str(
            r#"{"symbol":"AAPL","qty":"10","avg_entry_price":"100.5","side":"long"}"#,
        )
        .unwrap();
        let position = p.into_position().unwrap();

        assert_eq!(position.quantity, dec!(10));
        assert_eq!(position.avg_entry_price, dec!(100.5));
    }

    #[test]
    fn test_invalid_decimal() {
        assert!(parse_decimal("cash", "n/a").is_err());
    }

    #[test]
    fn test_data_error_mapping() {
        assert!(matches!(
            data_error("XYZ", BrokerError::ApiError("404 Not Found: ".into())),
            DataError::SymbolNotFound(_)
        ));
        assert!(matches!(
            data_error("XYZ", BrokerError::Connection("timeout".into())),
            DataError::ConnectionError(_)
        ));
    }
}
