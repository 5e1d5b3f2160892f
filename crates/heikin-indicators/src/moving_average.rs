//! Moving average indicators.

use heikin_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period. A zero period is
    /// treated as 1.
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }

        let period_f64 = self.period as f64;

        // Initial sum
        let mut sum: f64 = data[..self.period].iter().sum();
        result[self.period - 1] = Some(sum / period_f64);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result[i] = Some(sum / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Seeded with the SMA of the first `period` values, so the first defined
/// entry is at index `period - 1`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified period. A zero period is
    /// treated as 1.
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        let multiplier = 2.0 / (period as f64 + 1.0);
        Self { period, multiplier }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }

        // Initialize with SMA
        let mut ema: f64 = data[..self.period].iter().sum::<f64>() / self.period as f64;
        result[self.period - 1] = Some(ema);

        let one_minus_mult = 1.0 - self.multiplier;
        for (i, &price) in data.iter().enumerate().skip(self.period) {
            ema = price * self.multiplier + ema * one_minus_mult;
            result[i] = Some(ema);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// EMA of `closes` with the given period, aligned with the input.
pub fn ema_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    Ema::new(period).calculate(closes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma.calculate(&data);

        assert_eq!(result.len(), 5);
        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert!((result[2].unwrap() - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result[3].unwrap() - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result[4].unwrap() - 4.0).abs() < 1e-10); // (3+4+5)/3
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5);
        let result = sma.calculate(&[1.0, 2.0, 3.0]);

        assert_eq!(result, vec![None, None, None]);
    }

    #[test]
    fn test_ema() {
        let ema = Ema::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = ema.calculate(&data);

        assert_eq!(result.len(), 5);
        assert!(result[..2].iter().all(Option::is_none));
        assert!((result[2].unwrap() - 2.0).abs() < 1e-10); // Initial SMA
        // mult = 2/(3+1) = 0.5
        // result[3] = 4 * 0.5 + 2 * 0.5 = 3.0
        assert!((result[3].unwrap() - 3.0).abs() < 1e-10);
        assert!((result[4].unwrap() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_series_undefined_before_period() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let ema = ema_series(&closes, 20);

        assert_eq!(ema.len(), 30);
        assert!(ema[..19].iter().all(Option::is_none));
        assert!(ema[19..].iter().all(Option::is_some));
    }

    #[test]
    fn test_ema_tracks_constant_series() {
        let closes = vec![42.0; 50];
        assert_eq!(Ema::new(20).last(&closes), Some(42.0));
    }
}
