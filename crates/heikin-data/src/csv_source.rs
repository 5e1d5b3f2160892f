//! CSV bar store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use csv::{ReaderBuilder, WriterBuilder};
use heikin_core::error::DataError;
use heikin_core::traits::MarketData;
use heikin_core::types::{normalize_bars, Bar, Timeframe};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// CSV record format.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRecord {
    #[serde(
        rename = "Date",
        alias = "date",
        alias = "timestamp",
        alias = "Timestamp"
    )]
    date: String,
    #[serde(rename = "Open", alias = "open")]
    open: f64,
    #[serde(rename = "High", alias = "high")]
    high: f64,
    #[serde(rename = "Low", alias = "low")]
    low: f64,
    #[serde(rename = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(rename = "Volume", alias = "volume", default)]
    volume: f64,
}

impl CsvRecord {
    fn from_bar(bar: &Bar) -> Self {
        Self {
            date: format_timestamp(bar.timestamp),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

/// Per-symbol CSV files under one directory.
#[derive(Debug, Clone)]
pub struct CsvBarStore {
    dir: PathBuf,
}

impl CsvBarStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `symbol`'s history.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }

    /// Overwrite `symbol`'s history with `bars`.
    pub fn save(&self, symbol: &str, bars: &[Bar]) -> Result<PathBuf, DataError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(symbol);

        let mut writer = WriterBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;
        for bar in bars {
            writer
                .serialize(CsvRecord::from_bar(bar))
                .map_err(|e| DataError::ParseError(e.to_string()))?;
        }
        writer.flush()?;

        debug!(symbol, bars = bars.len(), path = %path.display(), "Saved bar history");
        Ok(path)
    }

    /// Load `symbol`'s history, oldest first and unique by timestamp.
    pub fn load(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }
        load_from_path(&path)
    }

    /// Symbols with a history file, sorted.
    pub fn symbols(&self) -> Result<Vec<String>, DataError> {
        let mut symbols = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    symbols.push(stem.to_string());
                }
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}

fn load_from_path(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DataError::ParseError(e.to_string()))?;

    let mut bars = Vec::new();
    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        bars.push(Bar::new(
            parse_timestamp(&record.date)?,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    normalize_bars(&mut bars);
    Ok(bars)
}

/// Dates at midnight UTC are written without a time.
fn format_timestamp(timestamp: i64) -> String {
    match DateTime::from_timestamp_millis(timestamp) {
        Some(dt) if dt.num_seconds_from_midnight() == 0 => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}

/// Parse various timestamp formats to Unix milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }

    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d-%m-%Y",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Some(dt) = NaiveDate::parse_from_str(date_str, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    // Unix timestamp, milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

/// Offline market data over a [`CsvBarStore`].
///
/// The current price is the last stored close.
#[derive(Debug, Clone)]
pub struct CsvMarketData {
    store: CsvBarStore,
}

impl CsvMarketData {
    pub fn new(store: CsvBarStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CsvBarStore {
        &self.store
    }
}

#[async_trait]
impl MarketData for CsvMarketData {
    async fn get_bars(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let mut bars = self.store.load(symbol)?;
        if bars.len() > lookback {
            bars.drain(..bars.len() - lookback);
        }
        Ok(bars)
    }

    async fn get_current_price(&self, symbol: &str) -> Result<Option<f64>, DataError> {
        Ok(self.store.load(symbol)?.last().map(|bar| bar.close))
    }

    fn name(&self) -> &str {
        "csv"
    }
}
