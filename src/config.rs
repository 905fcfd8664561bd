//! Configuration loading and validation.
//!
//! # Example
//!
//! ```no_run
//! use dipcatch::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

mod logging;
mod strategy;
mod timing;

pub use logging::LoggingConfig;
pub use strategy::StrategyConfig;
pub use timing::TimingConfig;

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::PairId;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    /// Instruments to trade.
    #[serde(default)]
    pub pairs: Vec<PairId>,
}

impl Config {
    /// Parse and validate configuration from TOML content.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        let strategy = &self.strategy;
        for (field, value) in [
            ("buy_amount", strategy.buy_amount),
            ("min_trade_amount", strategy.min_trade_amount),
            ("profit_target", strategy.profit_target),
        ] {
            if value <= Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
        }
        if strategy.max_loss <= Decimal::ZERO || strategy.max_loss >= Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "max_loss",
                reason: "must be between 0 and 1 (exclusive)".to_string(),
            }
            .into());
        }
        if strategy.buy_amount < strategy.min_trade_amount {
            return Err(ConfigError::InvalidValue {
                field: "buy_amount",
                reason: "must be >= min_trade_amount".to_string(),
            }
            .into());
        }

        for (field, secs) in self.timing.windows() {
            if secs > TimingConfig::MAX_WINDOW_SECS {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be at most {}", TimingConfig::MAX_WINDOW_SECS),
                }
                .into());
            }
        }
        if self.timing.buy_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "buy_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.pairs.is_empty() {
            return Err(ConfigError::MissingField { field: "pairs" }.into());
        }
        let mut seen = HashSet::new();
        for pair in &self.pairs {
            if pair.as_str().trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "pairs",
                    reason: "pair name cannot be empty".to_string(),
                }
                .into());
            }
            if !seen.insert(pair) {
                return Err(ConfigError::InvalidValue {
                    field: "pairs",
                    reason: format!("duplicate pair {pair}"),
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::parse_toml(r#"pairs = ["ETHBTC"]"#).unwrap();
        assert_eq!(config.timing.buy_timeout_secs, 180);
        assert_eq!(config.strategy.gate.min_history, 500);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.pairs, vec![PairId::from("ETHBTC")]);
    }

    #[test]
    fn rejects_missing_pairs() {
        let err = Config::parse_toml("").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField { field: "pairs" })
        ));
    }

    #[test]
    fn rejects_loss_fraction_out_of_range() {
        let toml = r#"
            pairs = ["ETHBTC"]
            [strategy]
            max_loss = 1.5
        "#;
        let err = Config::parse_toml(toml).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "max_loss", .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_timing_window() {
        let toml = r#"
            pairs = ["ETHBTC"]
            [timing]
            gate_throttle_secs = 100000000000000000
        "#;
        let err = Config::parse_toml(toml).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "gate_throttle_secs", .. })
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = Config::parse_toml("pairs = [").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
