//! Timing windows and sizing parameters applied by the state machine.

use chrono::Duration;
use rust_decimal::Decimal;

use crate::config::{StrategyConfig, TimingConfig};

/// Debounce and timeout windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingPolicy {
    /// Minimum spacing between validity gate evaluations.
    pub gate_throttle: Duration,
    /// Age after which an unfilled buy order is cancelled.
    pub buy_timeout: Duration,
    /// Minimum spacing between buy placement attempts.
    pub buy_retry: Duration,
    /// Minimum spacing between drift-driven sell recreations.
    pub sell_retry: Duration,
    /// Maximum acceptable age of the validation charts, in seconds.
    pub chart_max_age_secs: u64,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            gate_throttle: Duration::seconds(60),
            buy_timeout: Duration::minutes(3),
            buy_retry: Duration::seconds(10),
            sell_retry: Duration::seconds(5),
            chart_max_age_secs: 60,
        }
    }
}

impl From<&TimingConfig> for TimingPolicy {
    fn from(config: &TimingConfig) -> Self {
        Self {
            gate_throttle: window(config.gate_throttle_secs),
            buy_timeout: window(config.buy_timeout_secs),
            buy_retry: window(config.buy_retry_secs),
            sell_retry: window(config.sell_retry_secs),
            chart_max_age_secs: config.chart_max_age_secs,
        }
    }
}

// Clamped so an unvalidated config can't overflow chrono's range.
fn window(secs: u64) -> Duration {
    let secs = secs.min(TimingConfig::MAX_WINDOW_SECS);
    Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
}

/// Position sizing and exit levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeSettings {
    /// Quote-currency notional spent per entry.
    pub buy_amount: Decimal,
    /// Fractional gain the sell target sits above entry.
    pub profit_target: Decimal,
    /// Fractional loss at which the stop sells.
    pub max_loss: Decimal,
}

impl Default for TradeSettings {
    fn default() -> Self {
        Self {
            buy_amount: Decimal::new(2, 3),
            profit_target: Decimal::new(1, 2),
            max_loss: Decimal::new(5, 2),
        }
    }
}

impl From<&StrategyConfig> for TradeSettings {
    fn from(config: &StrategyConfig) -> Self {
        Self {
            buy_amount: config.buy_amount,
            profit_target: config.profit_target,
            max_loss: config.max_loss,
        }
    }
}
