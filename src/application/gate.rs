//! Validity gate: decides whether a pair is worth watching at all.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::application::context::StrategyContext;
use crate::domain::{Bar, Phase, Position, Timeframe, VALIDATION_TIMEFRAMES, WATCH_TIMEFRAMES};
use crate::port::Indicators;

const STOCH_PERIOD: usize = 14;
const SLOW_STOCH_SMOOTHING: usize = 11;
const FAST_STOCH_SMOOTHING: usize = 24;
const MAX_DIFF_LOOKBACK: usize = 120;
const VOLUME_LOOKBACK: usize = 60;

/// Eligibility thresholds. All must hold at once.
#[derive(Debug, Clone, Deserialize)]
pub struct GateThresholds {
    /// Bars required on each validation timeframe.
    #[serde(default = "default_min_history")]
    pub min_history: usize,
    /// Inclusive lower bound on 24h volume.
    #[serde(default = "default_min_volume")]
    pub min_volume: f64,
    /// Exclusive lower bound on the 1h stochastic average.
    #[serde(default = "default_min_slow_stochastic")]
    pub min_slow_stochastic: f64,
    /// Inclusive lower bound on the 5m stochastic average.
    #[serde(default = "default_min_fast_stochastic")]
    pub min_fast_stochastic: f64,
    /// Exclusive upper bound on the 5m max-diff volatility measure.
    #[serde(default = "default_max_volatility")]
    pub max_volatility: f64,
}

pub(crate) const fn default_min_history() -> usize {
    500
}

fn default_min_volume() -> f64 {
    100.0
}

fn default_min_slow_stochastic() -> f64 {
    30.0
}

fn default_min_fast_stochastic() -> f64 {
    20.0
}

fn default_max_volatility() -> f64 {
    100.0
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            min_history: default_min_history(),
            min_volume: default_min_volume(),
            min_slow_stochastic: default_min_slow_stochastic(),
            min_fast_stochastic: default_min_fast_stochastic(),
            max_volatility: default_max_volatility(),
        }
    }
}

/// Indicator values the gate decides on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateReadings {
    pub volume_24h: f64,
    pub slow_stochastic: f64,
    pub fast_stochastic: f64,
    pub max_diff: f64,
}

impl GateReadings {
    /// Compute readings from the 1h (`slow`) and 5m (`fast`) charts.
    pub fn compute(indicators: &dyn Indicators, slow: &[Bar], fast: &[Bar]) -> Self {
        let slow_stoch = indicators.stochastic(slow, STOCH_PERIOD, SLOW_STOCH_SMOOTHING);
        let fast_stoch = indicators.stochastic(fast, STOCH_PERIOD, FAST_STOCH_SMOOTHING);
        Self {
            volume_24h: indicators.volume_24h(slow, VOLUME_LOOKBACK),
            slow_stochastic: indicators.average(&slow_stoch),
            fast_stochastic: indicators.average(&fast_stoch),
            max_diff: indicators.max_diff(fast, MAX_DIFF_LOOKBACK),
        }
    }

    #[must_use]
    pub fn is_eligible(&self, thresholds: &GateThresholds) -> bool {
        self.volume_24h >= thresholds.min_volume
            && self.slow_stochastic > thresholds.min_slow_stochastic
            && self.fast_stochastic >= thresholds.min_fast_stochastic
            && self.max_diff < thresholds.max_volatility
    }
}

/// What a gate evaluation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Evaluated less than a throttle window ago; nothing changed.
    Throttled,
    /// Validation charts are stale; retry once they are refreshed.
    Deferred,
    /// Evaluated; the pair is now valid or invalid.
    Checked { valid: bool },
}

impl GateOutcome {
    #[must_use]
    pub fn is_valid(&self) -> Option<bool> {
        match self {
            GateOutcome::Checked { valid } => Some(*valid),
            _ => None,
        }
    }
}

/// Evaluate the gate for `position` at `now`.
///
/// Only acts in [`Phase::Invalid`] and [`Phase::Validating`]; other phases
/// are reported as throttled.
pub fn evaluate(ctx: &StrategyContext, position: &mut Position, now: DateTime<Utc>) -> GateOutcome {
    if !position.phase().is_gated() {
        return GateOutcome::Throttled;
    }

    if let Some(last) = position.last_valid_check {
        if now - last < ctx.timing.gate_throttle {
            return GateOutcome::Throttled;
        }
    }

    let pair = position.pair().clone();
    if ctx.market.charts_need_update(
        &pair,
        &VALIDATION_TIMEFRAMES,
        ctx.timing.chart_max_age_secs,
        true,
    ) {
        debug!(pair = %pair, "Validation charts stale, deferring gate");
        return GateOutcome::Deferred;
    }

    position.last_valid_check = Some(now);

    let slow = ctx.market.chart(&pair, Timeframe::OneHour);
    let fast = ctx.market.chart(&pair, Timeframe::FiveMinutes);

    let valid = if slow.len() < ctx.gate.min_history || fast.len() < ctx.gate.min_history {
        debug!(
            pair = %pair,
            bars_1h = slow.len(),
            bars_5m = fast.len(),
            "Not enough history"
        );
        false
    } else {
        let readings = GateReadings::compute(ctx.indicators.as_ref(), &slow, &fast);
        debug!(pair = %pair, readings = ?readings, "Gate readings");
        readings.is_eligible(&ctx.gate)
    };

    set_valid(ctx, position, valid);
    GateOutcome::Checked { valid }
}

fn set_valid(ctx: &StrategyContext, position: &mut Position, valid: bool) {
    let pair = position.pair().clone();
    match (position.phase(), valid) {
        (Phase::Invalid, true) => {
            ctx.market.add_watcher_chart_updates(&pair, &WATCH_TIMEFRAMES);
            position.become_valid();
            info!(pair = %pair, "Pair became tradable");
        }
        (Phase::Validating, false) => {
            ctx.market.remove_watcher_chart_updates(&pair, &WATCH_TIMEFRAMES);
            position.become_invalid();
            info!(pair = %pair, "Pair no longer tradable");
        }
        _ => {}
    }
}
