//! Configuration structures.

use std::path::PathBuf;

use heikin_core::error::StrategyError;
use heikin_core::traits::StrategyConfig;
use heikin_engine::{ScheduleConfig, WatchlistConfig};
use heikin_risk::RiskConfig;
use heikin_strategy::{BiasFilter, HeikinAshiConfig, StrategyRegistry, DEFAULT_PRESET};
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub alpaca: AlpacaSettings,
    #[serde(default)]
    pub strategy: StrategySettings,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
    #[serde(default)]
    pub data: DataSettings,
}

impl AppConfig {
    /// Every violation found, empty when the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Err(e) = self.risk.validate() {
            errors.push(e.to_string());
        }

        if self.strategy.trend_window == 0 {
            errors.push("strategy.trend_window must be at least 1".to_string());
        }
        if self.strategy.min_bars < 2 {
            errors.push("strategy.min_bars must be at least 2".to_string());
        }
        match self.strategy.build() {
            Ok(strategy) => {
                if let Err(e) = strategy.bias.validate() {
                    errors.push(format!("strategy.bias: {e}"));
                }
                let warmup = strategy.min_bars.max(strategy.bias.warmup());
                if self.schedule.lookback < warmup {
                    errors.push(format!(
                        "schedule.lookback ({}) is shorter than the strategy warmup ({})",
                        self.schedule.lookback, warmup
                    ));
                }
            }
            Err(e) => errors.push(format!("strategy: {e}")),
        }

        if self.schedule.cadence_secs == 0 {
            errors.push("schedule.cadence_secs must be greater than 0".to_string());
        }
        if !self.watchlist.has_source() {
            errors.push(
                "watchlist needs symbols, an exchange or include_positions".to_string(),
            );
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            errors.push(format!(
                "logging.format must be pretty or json, got {}",
                self.logging.format
            ));
        }
        if !matches!(self.alpaca.data_feed.as_str(), "iex" | "sip") {
            errors.push(format!(
                "alpaca.data_feed must be iex or sip, got {}",
                self.alpaca.data_feed
            ));
        }
        if !matches!(self.alpaca.time_in_force.as_str(), "day" | "gtc") {
            errors.push(format!(
                "alpaca.time_in_force must be day or gtc, got {}",
                self.alpaca.time_in_force
            ));
        }

        errors
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "heikin".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Warning log file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Alpaca API configuration. Credentials are read from the named
/// environment variables, never from the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlpacaSettings {
    pub api_key_env: String,
    pub api_secret_env: String,
    pub paper: bool,
    /// `iex` or `sip`
    pub data_feed: String,
    /// `day` or `gtc`
    pub time_in_force: String,
}

impl Default for AlpacaSettings {
    fn default() -> Self {
        Self {
            api_key_env: "ALPACA_API_KEY".to_string(),
            api_secret_env: "ALPACA_API_SECRET".to_string(),
            paper: true,
            data_feed: "iex".to_string(),
            time_in_force: "gtc".to_string(),
        }
    }
}

/// Strategy selection.
///
/// `preset` picks a registered variant (default `ha_ema20`); an explicit
/// `bias` replaces the preset's filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    pub preset: Option<String>,
    pub bias: Option<BiasFilter>,
    pub trend_window: usize,
    pub min_bars: usize,
}

impl Default for StrategySettings {
    fn default() -> Self {
        let defaults = HeikinAshiConfig::default();
        Self {
            preset: None,
            bias: None,
            trend_window: defaults.trend_window,
            min_bars: defaults.min_bars,
        }
    }
}

impl StrategySettings {
    /// Preset name in effect.
    pub fn preset_name(&self) -> &str {
        self.preset.as_deref().unwrap_or(DEFAULT_PRESET)
    }

    /// Resolve to a validated strategy configuration.
    pub fn resolve(&self) -> Result<HeikinAshiConfig, StrategyError> {
        let config = self.build()?;
        config.validate()?;
        Ok(config)
    }

    fn build(&self) -> Result<HeikinAshiConfig, StrategyError> {
        let mut config = StrategyRegistry::new().config(self.preset_name())?;
        if let Some(bias) = &self.bias {
            config.bias = bias.clone();
        }
        config.trend_window = self.trend_window;
        config.min_bars = self.min_bars;
        Ok(config)
    }
}

/// Bar history persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory receiving `<SYMBOL>.csv` for every fetched history
    pub bar_store: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();

        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert_eq!(config.strategy.preset_name(), "ha_ema20");
        assert_eq!(config.strategy.resolve().unwrap(), HeikinAshiConfig::default());
    }

    #[test]
    fn test_validate_collects_every_violation() {
        let mut config = AppConfig::default();
        config.risk.risk_fraction = dec!(0);
        config.strategy.min_bars = 1;
        config.schedule.cadence_secs = 0;
        config.watchlist.include_positions = false;
        config.logging.format = "xml".to_string();

        let errors = config.validate();

        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("risk_fraction")));
        assert!(errors.iter().any(|e| e.contains("min_bars")));
        assert!(errors.iter().any(|e| e.contains("cadence_secs")));
        assert!(errors.iter().any(|e| e.contains("watchlist")));
        assert!(errors.iter().any(|e| e.contains("logging.format")));
    }

    #[test]
    fn test_unknown_preset() {
        let settings = StrategySettings {
            preset: Some("turtle".to_string()),
            ..Default::default()
        };

        assert!(settings.resolve().is_err());
        let config = AppConfig {
            strategy: settings,
            ..Default::default()
        };
        assert!(config.validate().iter().any(|e| e.contains("turtle")));
    }

    #[test]
    fn test_lookback_shorter_than_warmup() {
        let mut config = AppConfig::default();
        config.strategy.preset = Some("macd_ma200".to_string());

        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("lookback"));
    }

    #[test]
    fn test_bias_overrides_preset() {
        let settings = StrategySettings {
            preset: Some("macd_ma200".to_string()),
            bias: Some(BiasFilter::PriceAboveEma { period: 50 }),
            ..Default::default()
        };

        let resolved = settings.resolve().unwrap();
        assert_eq!(resolved.bias, BiasFilter::PriceAboveEma { period: 50 });
        assert_eq!(resolved.min_bars, 40);
    }
}
