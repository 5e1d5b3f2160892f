//! Bar history persistence.
//!
//! One CSV file per symbol (`<dir>/<SYMBOL>.csv`, header
//! `Date,Open,High,Low,Close,Volume`) and a `MarketData` implementation
//! reading from such a directory.

mod csv_source;

pub use csv_source::{CsvBarStore, CsvMarketData};
