//! Named strategy presets.

use std::collections::BTreeMap;

use heikin_core::error::StrategyError;
use heikin_core::traits::StrategyConfig;
use serde::{Deserialize, Serialize};

use crate::filter::BiasFilter;
use crate::heikin_ashi::{HeikinAshiConfig, HeikinAshiStrategy};

/// Preset used when the configuration names none.
pub const DEFAULT_PRESET: &str = "ha_ema20";

/// Information about a registered preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Preset key
    pub name: String,
    /// Preset description
    pub description: String,
    /// Configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry of Heikin-Ashi strategy presets.
pub struct StrategyRegistry {
    presets: BTreeMap<&'static str, (&'static str, HeikinAshiConfig)>,
}

impl StrategyRegistry {
    /// Create a registry with all built-in presets.
    pub fn new() -> Self {
        let mut presets = BTreeMap::new();

        presets.insert(
            "ha_ema20",
            (
                "Heikin-Ashi with price above EMA(20) as the bias",
                HeikinAshiConfig::default(),
            ),
        );
        presets.insert(
            "ha_ema10_30",
            (
                "Heikin-Ashi with EMA(10) above EMA(30) as the bias",
                HeikinAshiConfig {
                    bias: BiasFilter::EmaCross { fast: 10, slow: 30 },
                    ..Default::default()
                },
            ),
        );
        presets.insert(
            "sma20_50",
            (
                "Heikin-Ashi with SMA(20) above SMA(50) as the bias",
                HeikinAshiConfig {
                    bias: BiasFilter::SmaCross { fast: 20, slow: 50 },
                    ..Default::default()
                },
            ),
        );
        presets.insert(
            "macd_ma200",
            (
                "Heikin-Ashi with MACD above signal and price above SMA(200) as the bias",
                HeikinAshiConfig {
                    bias: BiasFilter::MacdTrend {
                        fast: 12,
                        slow: 26,
                        signal: 9,
                        ma_period: 200,
                    },
                    ..Default::default()
                },
            ),
        );

        Self { presets }
    }

    /// List all presets, sorted by name.
    pub fn list(&self) -> Vec<StrategyInfo> {
        self.presets
            .iter()
            .map(|(name, (description, config))| StrategyInfo {
                name: name.to_string(),
                description: description.to_string(),
                default_config: serde_json::to_value(config).unwrap_or_default(),
            })
            .collect()
    }

    /// Check if a preset exists.
    pub fn exists(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// Get all preset names.
    pub fn names(&self) -> Vec<&'static str> {
        self.presets.keys().copied().collect()
    }

    /// Configuration of a preset.
    pub fn config(&self, name: &str) -> Result<HeikinAshiConfig, StrategyError> {
        self.presets
            .get(name)
            .map(|(_, config)| config.clone())
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))
    }

    /// Create a strategy from a preset.
    pub fn create(&self, name: &str) -> Result<HeikinAshiStrategy, StrategyError> {
        Self::create_with(self.config(name)?)
    }

    /// Create a strategy from an explicit configuration.
    pub fn create_with(config: HeikinAshiConfig) -> Result<HeikinAshiStrategy, StrategyError> {
        config.validate()?;
        Ok(HeikinAshiStrategy::new(config))
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heikin_core::traits::Strategy;

    #[test]
    fn test_registry_list() {
        let registry = StrategyRegistry::new();
        let names: Vec<String> = registry.list().into_iter().map(|i| i.name).collect();

        assert_eq!(names, vec!["ha_ema10_30", "ha_ema20", "macd_ma200", "sma20_50"]);
    }

    #[test]
    fn test_default_preset_exists() {
        let registry = StrategyRegistry::new();
        assert!(registry.exists(DEFAULT_PRESET));
        assert_eq!(registry.config(DEFAULT_PRESET).unwrap(), HeikinAshiConfig::default());
    }

    #[test]
    fn test_create() {
        let registry = StrategyRegistry::new();

        let strategy = registry.create("macd_ma200").unwrap();
        assert_eq!(strategy.warmup_period(), 200);
        assert!(strategy.name().contains("MACD"));
    }

    #[test]
    fn test_create_unknown_preset() {
        let registry = StrategyRegistry::new();

        assert_eq!(
            registry.create("unknown").err(),
            Some(StrategyError::NotFound("unknown".to_string()))
        );
    }

    #[test]
    fn test_create_with_invalid_config() {
        let config = HeikinAshiConfig {
            bias: BiasFilter::EmaCross { fast: 30, slow: 10 },
            ..Default::default()
        };
        assert!(StrategyRegistry::create_with(config).is_err());
    }

    #[test]
    fn test_default_config_json() {
        let registry = StrategyRegistry::new();
        let info = registry
            .list()
            .into_iter()
            .find(|i| i.name == "ha_ema20")
            .unwrap();

        assert_eq!(info.default_config["bias"]["kind"], "price_above_ema");
        assert_eq!(info.default_config["min_bars"], 40);
    }
}
