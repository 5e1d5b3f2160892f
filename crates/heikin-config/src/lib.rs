//! Configuration management.
//!
//! A required TOML file overlaid by `HEIKIN__SECTION__KEY` environment
//! variables, e.g. `HEIKIN__RISK__RISK_FRACTION=0.05`.

mod settings;

pub use settings::{
    AlpacaSettings, AppConfig, AppSettings, DataSettings, LoggingConfig, StrategySettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "HEIKIN";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    load_with_prefix(path, ENV_PREFIX)
}

fn load_with_prefix(path: &Path, prefix: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(prefix)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("watchlist.symbols"),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use heikin_core::types::Timeframe;
    use heikin_risk::SizeRounding;
    use heikin_strategy::BiasFilter;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_file() {
        let file = write_config(
            r#"
[logging]
level = "debug"
format = "json"

[strategy]
preset = "ha_ema10_30"
trend_window = 12

[risk]
risk_fraction = 0.05
rounding = "down"

[schedule]
timeframe = "1h"
cadence_secs = 30

[watchlist]
symbols = ["AAPL", "MSFT"]
exchange = "NASDAQ"
max_candidates = 25

[data]
bar_store = "data/bars"
"#,
        );

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.strategy.preset.as_deref(), Some("ha_ema10_30"));
        assert_eq!(config.strategy.trend_window, 12);
        assert_eq!(config.strategy.min_bars, 40);
        assert_eq!(config.risk.risk_fraction, dec!(0.05));
        assert_eq!(config.risk.profit_margin, dec!(0.03));
        assert_eq!(config.risk.rounding, SizeRounding::Down);
        assert_eq!(config.schedule.timeframe, Timeframe::Hour1);
        assert_eq!(config.schedule.cadence_secs, 30);
        assert_eq!(config.schedule.close_buffer_secs, 120);
        assert_eq!(config.watchlist.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(config.watchlist.max_candidates, Some(25));
        assert!(config.watchlist.include_positions);
        assert_eq!(
            config.data.bar_store.as_deref(),
            Some(Path::new("data/bars"))
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_explicit_bias() {
        let file = write_config(
            r#"
[strategy.bias]
kind = "sma_cross"
fast = 20
slow = 50
"#,
        );

        let config = load_config(file.path()).unwrap();
        let resolved = config.strategy.resolve().unwrap();

        assert_eq!(resolved.bias, BiasFilter::SmaCross { fast: 20, slow: 50 });
    }

    #[test]
    fn test_written_defaults_load_back() {
        let defaults = AppConfig::default();
        let file = write_config(&toml::to_string(&defaults).unwrap());

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.risk, defaults.risk);
        assert_eq!(config.schedule, defaults.schedule);
        assert_eq!(config.watchlist, defaults.watchlist);
        assert_eq!(config.alpaca.time_in_force, "gtc");
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(load_config(Path::new("/nonexistent/heikin.toml")).is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = write_config("[schedule]\ncadence_secs = 30\n");
        std::env::set_var("HEIKIN_CFG_TEST__SCHEDULE__CADENCE_SECS", "15");
        std::env::set_var("HEIKIN_CFG_TEST__WATCHLIST__SYMBOLS", "SPY,QQQ");

        let config = load_with_prefix(file.path(), "HEIKIN_CFG_TEST").unwrap();

        assert_eq!(config.schedule.cadence_secs, 15);
        assert_eq!(config.watchlist.symbols, vec!["SPY", "QQQ"]);
    }
}
