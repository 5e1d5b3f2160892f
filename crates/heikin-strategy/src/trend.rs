//! Trend verdict over a window of bar labels.

use heikin_core::types::{BarType, TrendVerdict};
use serde::{Deserialize, Serialize};

/// Label counts in a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendCounts {
    pub bull: usize,
    pub bear: usize,
    pub indecisive: usize,
}

impl TrendCounts {
    /// Count labels.
    pub fn from_labels(labels: &[BarType]) -> Self {
        labels.iter().fold(Self::default(), |mut counts, label| {
            match label {
                BarType::Bull => counts.bull += 1,
                BarType::Bear => counts.bear += 1,
                BarType::Indecisive => counts.indecisive += 1,
            }
            counts
        })
    }

    /// Window length.
    pub fn total(&self) -> usize {
        self.bull + self.bear + self.indecisive
    }

    /// Bars that were not indecisive.
    pub fn decisive(&self) -> usize {
        self.total() - self.indecisive
    }
}

/// Classify a window of labels.
///
/// ```text
/// bear >= 0.5 * decisive  -> PULLBACK
/// bull >  0.5 * decisive  -> DROP
/// otherwise               -> NO_TREND
/// ```
///
/// BEAR dominance is checked first. A window with no decisive bars (all
/// INDECISIVE, or empty) satisfies `0 >= 0` and yields PULLBACK.
pub fn analyze_trend(labels: &[BarType]) -> TrendVerdict {
    let counts = TrendCounts::from_labels(labels);
    let half_decisive = 0.5 * counts.decisive() as f64;

    if counts.bear as f64 >= half_decisive {
        TrendVerdict::Pullback
    } else if counts.bull as f64 > half_decisive {
        TrendVerdict::Drop
    } else {
        TrendVerdict::NoTrend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BarType::*;

    fn window(bull: usize, bear: usize, indecisive: usize) -> Vec<BarType> {
        let mut labels = vec![Bull; bull];
        labels.extend(vec![Bear; bear]);
        labels.extend(vec![Indecisive; indecisive]);
        labels
    }

    #[test]
    fn test_bear_dominant_is_pullback() {
        // 6 >= 0.5 * (10 - 2)
        assert_eq!(analyze_trend(&window(2, 6, 2)), TrendVerdict::Pullback);
    }

    #[test]
    fn test_bull_dominant_is_drop() {
        assert_eq!(analyze_trend(&window(7, 1, 2)), TrendVerdict::Drop);
    }

    #[test]
    fn test_even_split_goes_to_bear_branch() {
        assert_eq!(analyze_trend(&window(4, 4, 2)), TrendVerdict::Pullback);
    }

    #[test]
    fn test_all_indecisive_is_pullback() {
        assert_eq!(analyze_trend(&window(0, 0, 5)), TrendVerdict::Pullback);
    }

    #[test]
    fn test_empty_window_is_pullback() {
        assert_eq!(analyze_trend(&[]), TrendVerdict::Pullback);
    }

    #[test]
    fn test_order_does_not_matter() {
        let labels = vec![Bull, Indecisive, Bull, Bear, Bull, Bull];
        let mut reversed = labels.clone();
        reversed.reverse();
        assert_eq!(analyze_trend(&labels), analyze_trend(&reversed));
        assert_eq!(analyze_trend(&labels), TrendVerdict::Drop);
    }

    #[test]
    fn test_counts() {
        let counts = TrendCounts::from_labels(&window(2, 6, 2));
        assert_eq!(counts.total(), 10);
        assert_eq!(counts.decisive(), 8);
    }
}
