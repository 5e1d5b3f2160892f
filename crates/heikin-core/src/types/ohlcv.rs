//! OHLCV (Open, High, Low, Close, Volume) bars.

use serde::{Deserialize, Serialize};

/// Raw price bar as delivered by the market data collaborator.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Average of the four prices, the Heikin-Ashi close of this bar.
    #[inline]
    pub fn ohlc4(&self) -> f64 {
        (self.open + self.high + self.low + self.close) / 4.0
    }

    /// Extract close prices.
    pub fn closes(bars: &[Bar]) -> Vec<f64> {
        bars.iter().map(|b| b.close).collect()
    }
}

/// Sort bars ascending by timestamp and drop duplicate timestamps,
/// keeping the last occurrence of each.
pub fn normalize_bars(bars: &mut Vec<Bar>) {
    // Stable sort keeps feed order among equal timestamps, so the later one wins.
    bars.sort_by_key(|b| b.timestamp);
    let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars.drain(..) {
        match out.last_mut() {
            Some(last) if last.timestamp == bar.timestamp => *last = bar,
            _ => out.push(bar),
        }
    }
    *bars = out;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ohlc4() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000000.0);
        assert!((bar.ohlc4() - 102.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_sorts_and_dedups() {
        let mut bars = vec![
            Bar::new(3, 1.0, 1.0, 1.0, 1.0, 1.0),
            Bar::new(1, 1.0, 1.0, 1.0, 1.0, 1.0),
            Bar::new(2, 1.0, 1.0, 1.0, 1.0, 1.0),
            Bar::new(2, 2.0, 2.0, 2.0, 2.0, 2.0),
        ];
        normalize_bars(&mut bars);

        let stamps: Vec<i64> = bars.iter().map(|b| b.timestamp).collect();
        assert_eq!(stamps, vec![1, 2, 3]);
        assert_eq!(bars[1].close, 2.0);
    }

    #[test]
    fn test_closes() {
        let bars = vec![
            Bar::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0),
            Bar::new(2, 100.5, 102.0, 100.0, 101.5, 2000.0),
        ];
        assert_eq!(Bar::closes(&bars), vec![100.5, 101.5]);
    }
}
