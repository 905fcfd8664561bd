//! Debounce and timeout windows, in seconds.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_gate_throttle_secs")]
    pub gate_throttle_secs: u64,
    #[serde(default = "default_buy_timeout_secs")]
    pub buy_timeout_secs: u64,
    #[serde(default = "default_buy_retry_secs")]
    pub buy_retry_secs: u64,
    #[serde(default = "default_sell_retry_secs")]
    pub sell_retry_secs: u64,
    #[serde(default = "default_chart_max_age_secs")]
    pub chart_max_age_secs: u64,
}

fn default_gate_throttle_secs() -> u64 {
    60
}

fn default_buy_timeout_secs() -> u64 {
    180
}

fn default_buy_retry_secs() -> u64 {
    10
}

fn default_sell_retry_secs() -> u64 {
    5
}

fn default_chart_max_age_secs() -> u64 {
    60
}

impl TimingConfig {
    /// Longest window any timing field accepts (one year).
    pub const MAX_WINDOW_SECS: u64 = 365 * 24 * 60 * 60;

    pub(crate) fn windows(&self) -> [(&'static str, u64); 5] {
        [
            ("gate_throttle_secs", self.gate_throttle_secs),
            ("buy_timeout_secs", self.buy_timeout_secs),
            ("buy_retry_secs", self.buy_retry_secs),
            ("sell_retry_secs", self.sell_retry_secs),
            ("chart_max_age_secs", self.chart_max_age_secs),
        ]
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            gate_throttle_secs: default_gate_throttle_secs(),
            buy_timeout_secs: default_buy_timeout_secs(),
            buy_retry_secs: default_buy_retry_secs(),
            sell_retry_secs: default_sell_retry_secs(),
            chart_max_age_secs: default_chart_max_age_secs(),
        }
    }
}
