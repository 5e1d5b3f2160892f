//! Momentum indicators.

use heikin_core::traits::Indicator;
use serde::{Deserialize, Serialize};

use crate::moving_average::Ema;

/// MACD output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods. Zero periods are treated as 1.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast_period: fast.max(1),
            slow_period: slow.max(1),
            signal_period: signal.max(1),
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Macd {
    type Output = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<Option<MacdOutput>> {
        let mut result = vec![None; data.len()];

        let fast = Ema::new(self.fast_period).calculate(data);
        let slow = Ema::new(self.slow_period).calculate(data);

        // MACD line is defined once both EMAs are
        let start = match fast
            .iter()
            .zip(slow.iter())
            .position(|(f, s)| f.is_some() && s.is_some())
        {
            Some(start) => start,
            None => return result,
        };

        let macd_line: Vec<f64> = fast[start..]
            .iter()
            .zip(slow[start..].iter())
            .map(|(f, s)| f.unwrap_or_default() - s.unwrap_or_default())
            .collect();

        // Signal line is an EMA over the defined part of the MACD line
        let signal_line = Ema::new(self.signal_period).calculate(&macd_line);

        for (offset, (&macd, signal)) in macd_line.iter().zip(signal_line).enumerate() {
            if let Some(signal) = signal {
                result[start + offset] = Some(MacdOutput {
                    macd,
                    signal,
                    histogram: macd - signal,
                });
            }
        }

        result
    }

    fn period(&self) -> usize {
        self.fast_period.max(self.slow_period) + self.signal_period - 1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// Relative Strength Index with Wilder smoothing.
///
/// The first defined value is at index `period`: the average gain and loss
/// are seeded with the mean of the first `period` price changes.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Readings below this mark an oversold bar.
    pub const OVERSOLD: f64 = 30.0;

    /// Create a new RSI. A zero period is treated as 1.
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }

    pub fn is_oversold(value: f64) -> bool {
        value < Self::OVERSOLD
    }

    fn index(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() <= self.period {
            return result;
        }

        let changes: Vec<(f64, f64)> = data
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                (change.max(0.0), (-change).max(0.0))
            })
            .collect();

        let period_f64 = self.period as f64;
        let (mut avg_gain, mut avg_loss) = changes[..self.period]
            .iter()
            .fold((0.0, 0.0), |(g, l), &(gain, loss)| (g + gain, l + loss));
        avg_gain /= period_f64;
        avg_loss /= period_f64;
        result[self.period] = Some(Self::index(avg_gain, avg_loss));

        for (i, &(gain, loss)) in changes.iter().enumerate().skip(self.period) {
            avg_gain = (avg_gain * (period_f64 - 1.0) + gain) / period_f64;
            avg_loss = (avg_loss * (period_f64 - 1.0) + loss) / period_f64;
            result[i + 1] = Some(Self::index(avg_gain, avg_loss));
        }

        result
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "RSI"
    }
}
