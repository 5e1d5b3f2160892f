//! Heikin-Ashi signal strategy.
//!
//! Transforms the bar history into labeled HA bars, reads the trend over the
//! most recent window and gates the result with a [`BiasFilter`]:
//!
//! - bullish bias: BUY_CANDIDATE, confirmed when the last bar is BULL and
//!   the window trend is PULLBACK
//! - otherwise: SELL_CANDIDATE, confirmed when the last two bars are BEAR
//!   and the window trend is DROP
//!
//! The stop-loss level is the low of the most recent BEAR bar in the window.

use heikin_core::error::StrategyError;
use heikin_core::traits::{Strategy, StrategyConfig};
use heikin_core::types::{
    Bar, BarType, HeikinAshiBar, Signal, SignalDirection, TrendVerdict,
};
use heikin_indicators::heikin_ashi;
use serde::{Deserialize, Serialize};

use crate::classifier::label_bars;
use crate::filter::{BiasFilter, BiasReading};
use crate::trend::{analyze_trend, TrendCounts};

/// Configuration for the Heikin-Ashi strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeikinAshiConfig {
    /// Trend gate deciding the bias
    pub bias: BiasFilter,
    /// Number of most recent HA bars the trend is read over
    pub trend_window: usize,
    /// Minimum history length before any signal is produced
    pub min_bars: usize,
}

impl Default for HeikinAshiConfig {
    fn default() -> Self {
        Self {
            bias: BiasFilter::default(),
            trend_window: 10,
            min_bars: 40,
        }
    }
}

impl StrategyConfig for HeikinAshiConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        self.bias.validate()?;
        if self.trend_window == 0 {
            return Err(StrategyError::InvalidConfig(
                "Trend window must be greater than 0".into(),
            ));
        }
        if self.min_bars < 2 {
            return Err(StrategyError::InvalidConfig(
                "At least 2 bars are required".into(),
            ));
        }
        Ok(())
    }
}

/// Labeled HA series with the window statistics the signal is built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleAnalysis {
    /// Full labeled HA series, oldest first
    pub bars: Vec<HeikinAshiBar>,
    /// Number of trailing bars in the trend window
    pub window_len: usize,
    pub counts: TrendCounts,
    pub trend: TrendVerdict,
    pub current: BarType,
    pub previous: BarType,
    /// Low of the most recent BEAR bar in the window
    pub stop_loss_price: Option<f64>,
}

impl CandleAnalysis {
    /// Transform, label and analyze raw bars.
    pub fn from_bars(bars: &[Bar], trend_window: usize) -> Result<Self, StrategyError> {
        let ha = heikin_ashi(bars)?;
        Self::from_labeled(label_bars(ha), trend_window)
    }

    /// Analyze an already labeled HA series. Needs at least two bars.
    pub fn from_labeled(
        bars: Vec<HeikinAshiBar>,
        trend_window: usize,
    ) -> Result<Self, StrategyError> {
        let n = bars.len();
        if n < 2 {
            return Err(StrategyError::InsufficientData {
                required: 2,
                available: n,
            });
        }

        let window_len = trend_window.clamp(1, n);
        let window = &bars[n - window_len..];
        let labels: Vec<BarType> = window.iter().map(label_of).collect();

        let stop_loss_price = window
            .iter()
            .rev()
            .find(|bar| bar.bar_type == Some(BarType::Bear))
            .map(|bar| bar.low);

        Ok(Self {
            counts: TrendCounts::from_labels(&labels),
            trend: analyze_trend(&labels),
            current: label_of(&bars[n - 1]),
            previous: label_of(&bars[n - 2]),
            stop_loss_price,
            window_len,
            bars,
        })
    }

    /// Bars in the trend window.
    pub fn window(&self) -> &[HeikinAshiBar] {
        &self.bars[self.bars.len() - self.window_len..]
    }

    /// Timestamp of the most recent bar.
    pub fn timestamp(&self) -> i64 {
        self.bars.last().map(|bar| bar.timestamp).unwrap_or_default()
    }

    /// Whether the bar/trend conditions for acting on `direction` hold.
    pub fn confirms(&self, direction: SignalDirection) -> bool {
        match direction {
            SignalDirection::BuyCandidate => {
                self.current == BarType::Bull && self.trend == TrendVerdict::Pullback
            }
            SignalDirection::SellCandidate => {
                self.current == BarType::Bear
                    && self.previous == BarType::Bear
                    && self.trend == TrendVerdict::Drop
            }
        }
    }
}

fn label_of(bar: &HeikinAshiBar) -> BarType {
    bar.bar_type.unwrap_or(BarType::Indecisive)
}

/// Heikin-Ashi strategy.
#[derive(Debug, Clone)]
pub struct HeikinAshiStrategy {
    config: HeikinAshiConfig,
    name: String,
}

impl HeikinAshiStrategy {
    /// Create a new strategy.
    pub fn new(config: HeikinAshiConfig) -> Self {
        let name = format!("Heikin-Ashi / {}", config.bias);
        Self { config, name }
    }

    pub fn config(&self) -> &HeikinAshiConfig {
        &self.config
    }

    /// Check the history length and analyze the candles.
    pub fn analyze(&self, bars: &[Bar]) -> Result<CandleAnalysis, StrategyError> {
        if !self.is_warmed_up(bars.len()) {
            return Err(StrategyError::InsufficientData {
                required: self.warmup_period(),
                available: bars.len(),
            });
        }
        CandleAnalysis::from_bars(bars, self.config.trend_window)
    }

    /// Build the signal from an analysis and a filter reading.
    pub fn signal_from(
        &self,
        symbol: &str,
        analysis: &CandleAnalysis,
        reading: BiasReading,
        price: f64,
    ) -> Signal {
        let direction = if reading.bullish {
            SignalDirection::BuyCandidate
        } else {
            SignalDirection::SellCandidate
        };

        Signal {
            symbol: symbol.to_string(),
            direction,
            confirmed: analysis.confirms(direction),
            stop_loss_price: analysis.stop_loss_price,
            current_bar: analysis.current,
            previous_bar: analysis.previous,
            trend: analysis.trend,
            price,
            reference: reading.reference,
            timestamp: analysis.timestamp(),
        }
    }
}

impl Default for HeikinAshiStrategy {
    fn default() -> Self {
        Self::new(HeikinAshiConfig::default())
    }
}

impl Strategy for HeikinAshiStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Heikin-Ashi bar structure and window trend, gated by a moving-average bias"
    }

    fn evaluate(&self, symbol: &str, bars: &[Bar], price: f64) -> Result<Signal, StrategyError> {
        let analysis = self.analyze(bars)?;

        let closes = Bar::closes(bars);
        let reading = self.config.bias.evaluate(&closes, price).ok_or(
            StrategyError::InsufficientData {
                required: self.config.bias.warmup(),
                available: bars.len(),
            },
        )?;

        Ok(self.signal_from(symbol, &analysis, reading, price))
    }

    fn warmup_period(&self) -> usize {
        self.config.min_bars.max(self.config.bias.warmup()).max(2)
    }
}
