//! Strategy sizing and indicator threshold configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::{EntryThresholds, GateThresholds};

/// `[strategy]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    /// Quote-currency notional spent per entry.
    #[serde(default = "default_buy_amount")]
    pub buy_amount: Decimal,
    /// Fraction above entry the sell target is set at.
    #[serde(default = "default_profit_target")]
    pub profit_target: Decimal,
    /// Fraction below entry at which the stop loss sells.
    #[serde(default = "default_max_loss")]
    pub max_loss: Decimal,
    /// Smallest quote notional the venue accepts.
    #[serde(default = "default_min_trade_amount")]
    pub min_trade_amount: Decimal,
    #[serde(default)]
    pub gate: GateThresholds,
    #[serde(default)]
    pub entry: EntryThresholds,
}

fn default_buy_amount() -> Decimal {
    Decimal::new(2, 3)
}

fn default_profit_target() -> Decimal {
    Decimal::new(1, 2)
}

fn default_max_loss() -> Decimal {
    Decimal::new(5, 2)
}

fn default_min_trade_amount() -> Decimal {
    Decimal::new(1, 3)
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            buy_amount: default_buy_amount(),
            profit_target: default_profit_target(),
            max_loss: default_max_loss(),
            min_trade_amount: default_min_trade_amount(),
            gate: GateThresholds::default(),
            entry: EntryThresholds::default(),
        }
    }
}
