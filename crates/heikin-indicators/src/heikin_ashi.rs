//! Heikin-Ashi candle transform.
//!
//! ```text
//! close[i] = (open[i] + high[i] + low[i] + close[i]) / 4
//! open[0]  = (open[0] + close[0]) / 2
//! open[i]  = (open[i-1] + close[i-1]) / 2          (HA values)
//! high[i]  = max(open[i], close[i], high[i])
//! low[i]   = min(open[i], close[i], low[i])
//! ```
//!
//! Each HA open depends on the previous HA bar, so the series is built
//! sequentially from the first bar. Values are not rounded.

use heikin_core::error::IndicatorError;
use heikin_core::types::{Bar, HeikinAshiBar};

/// Transform raw bars into an unlabeled Heikin-Ashi series of the same
/// length and order.
pub fn heikin_ashi(bars: &[Bar]) -> Result<Vec<HeikinAshiBar>, IndicatorError> {
    let first = bars.first().ok_or(IndicatorError::InsufficientData {
        required: 1,
        available: 0,
    })?;

    let mut out = Vec::with_capacity(bars.len());
    let mut prev_open = (first.open + first.close) / 2.0;
    let mut prev_close = f64::NAN;

    for (i, bar) in bars.iter().enumerate() {
        let ha_close = bar.ohlc4();
        let ha_open = if i == 0 {
            prev_open
        } else {
            (prev_open + prev_close) / 2.0
        };

        out.push(HeikinAshiBar {
            timestamp: bar.timestamp,
            open: ha_open,
            high: ha_open.max(ha_close).max(bar.high),
            low: ha_open.min(ha_close).min(bar.low),
            close: ha_close,
            bar_type: None,
        });

        prev_open = ha_open;
        prev_close = ha_close;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(
            heikin_ashi(&[]),
            Err(IndicatorError::InsufficientData {
                required: 1,
                available: 0
            })
        );
    }

    #[test]
    fn test_first_bar() {
        let bars = vec![Bar::new(1, 10.0, 14.0, 8.0, 12.0, 100.0)];
        let ha = heikin_ashi(&bars).unwrap();

        assert_eq!(ha.len(), 1);
        assert_eq!(ha[0].open, 11.0);
        assert_eq!(ha[0].close, 11.0);
        assert_eq!(ha[0].high, 14.0);
        assert_eq!(ha[0].low, 8.0);
        assert_eq!(ha[0].timestamp, 1);
        assert!(ha[0].bar_type.is_none());
    }

    #[test]
    fn test_recursive_open() {
        let bars = vec![
            Bar::new(1, 10.0, 14.0, 8.0, 12.0, 100.0),
            Bar::new(2, 12.0, 16.0, 11.0, 15.0, 100.0),
            Bar::new(3, 15.0, 15.5, 13.0, 13.5, 100.0),
        ];
        let ha = heikin_ashi(&bars).unwrap();

        // open[1] = (11 + 11) / 2
        assert_eq!(ha[1].open, 11.0);
        assert_eq!(ha[1].close, 13.5);
        assert_eq!(ha[1].high, 16.0);
        assert_eq!(ha[1].low, 11.0);

        // open[2] = (11 + 13.5) / 2
        assert_eq!(ha[2].open, 12.25);
        assert_eq!(ha[2].close, 14.25);
        assert_eq!(ha[2].high, 15.5);
        assert_eq!(ha[2].low, 12.25);
    }

    #[test]
    fn test_timestamps_preserved() {
        let bars: Vec<Bar> = (0..5)
            .map(|i| Bar::new(i * 60_000, 10.0, 11.0, 9.0, 10.5, 1.0))
            .collect();
        let ha = heikin_ashi(&bars).unwrap();

        let stamps: Vec<i64> = ha.iter().map(|b| b.timestamp).collect();
        assert_eq!(stamps, vec![0, 60_000, 120_000, 180_000, 240_000]);
    }
}
