//! Entry evaluator: looks for an oversold dip on a tradable pair.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::application::command::{Action, Command};
use crate::application::context::StrategyContext;
use crate::application::gate::default_min_history;
use crate::domain::{last_close, price_from_f64, Bar, Position, Price, Side, Timeframe};
use crate::error::ExecutionError;
use crate::port::{BuyPlacement, Event, Indicators};

const STOCH_PERIOD: usize = 14;
const STOCH_SMOOTHING: usize = 3;
const RSI_PERIOD: usize = 14;
const RSI_SCALE: f64 = 100.0;

/// One of the two alternative oversold setups.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Setup {
    /// Exclusive bound on the 15m stochastic average.
    pub max_medium_stochastic: f64,
    /// Exclusive bound on the 5m relative strength.
    pub max_rsi: f64,
}

impl Setup {
    fn matches(&self, readings: &EntryReadings) -> bool {
        readings.medium_stochastic < self.max_medium_stochastic && readings.rsi < self.max_rsi
    }
}

/// Entry thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryThresholds {
    /// Bars required on each watched timeframe.
    #[serde(default = "default_min_history")]
    pub min_history: usize,
    /// Exclusive bound on the 1h stochastic average.
    #[serde(default = "default_max_slow_stochastic")]
    pub max_slow_stochastic: f64,
    /// Exclusive bound on the 5m stochastic average.
    #[serde(default = "default_max_fast_stochastic")]
    pub max_fast_stochastic: f64,
    /// Deep 15m dip with a moderately low RSI.
    #[serde(default = "default_deep_dip")]
    pub deep_dip: Setup,
    /// Shallower 15m dip that needs a lower RSI.
    #[serde(default = "default_sharp_dip")]
    pub sharp_dip: Setup,
}

fn default_max_slow_stochastic() -> f64 {
    45.0
}

fn default_max_fast_stochastic() -> f64 {
    20.0
}

fn default_deep_dip() -> Setup {
    Setup {
        max_medium_stochastic: 15.0,
        max_rsi: 26.0,
    }
}

fn default_sharp_dip() -> Setup {
    Setup {
        max_medium_stochastic: 30.0,
        max_rsi: 21.0,
    }
}

impl Default for EntryThresholds {
    fn default() -> Self {
        Self {
            min_history: default_min_history(),
            max_slow_stochastic: default_max_slow_stochastic(),
            max_fast_stochastic: default_max_fast_stochastic(),
            deep_dip: default_deep_dip(),
            sharp_dip: default_sharp_dip(),
        }
    }
}

/// Indicator values the entry decision reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryReadings {
    pub rsi: f64,
    pub slow_stochastic: f64,
    pub medium_stochastic: f64,
    pub fast_stochastic: f64,
}

impl EntryReadings {
    /// Compute readings from the 1h, 15m and 5m charts.
    pub fn compute(indicators: &dyn Indicators, slow: &[Bar], medium: &[Bar], fast: &[Bar]) -> Self {
        let rsi = indicators
            .rsi(fast, RSI_PERIOD, RSI_SCALE, 1)
            .first()
            .copied()
            .unwrap_or(f64::NAN);
        let stoch = |bars: &[Bar]| {
            indicators.average(&indicators.stochastic(bars, STOCH_PERIOD, STOCH_SMOOTHING))
        };
        Self {
            rsi,
            slow_stochastic: stoch(slow),
            medium_stochastic: stoch(medium),
            fast_stochastic: stoch(fast),
        }
    }

    /// NaN readings never satisfy a bound, so missing data never enters.
    #[must_use]
    pub fn should_enter(&self, thresholds: &EntryThresholds) -> bool {
        self.slow_stochastic < thresholds.max_slow_stochastic
            && self.fast_stochastic < thresholds.max_fast_stochastic
            && (thresholds.deep_dip.matches(self) || thresholds.sharp_dip.matches(self))
    }
}

/// Look for an entry and, if found, issue a buy at the latest 5m close.
pub fn evaluate(
    ctx: &StrategyContext,
    position: &mut Position,
    now: DateTime<Utc>,
) -> Option<Command> {
    let pair = position.pair().clone();
    let slow = ctx.market.chart(&pair, Timeframe::OneHour);
    let medium = ctx.market.chart(&pair, Timeframe::FifteenMinutes);
    let fast = ctx.market.chart(&pair, Timeframe::FiveMinutes);

    let min = ctx.entry.min_history;
    if slow.len() < min || medium.len() < min || fast.len() < min {
        return None;
    }

    let readings = EntryReadings::compute(ctx.indicators.as_ref(), &slow, &medium, &fast);
    if !readings.should_enter(&ctx.entry) {
        return None;
    }

    let Some(price) = last_close(&fast).and_then(price_from_f64) else {
        warn!(pair = %pair, "Entry signal without a usable close price");
        return None;
    };

    if !position.buy_retry.try_acquire(now, ctx.timing.buy_retry) {
        debug!(pair = %pair, "Buy attempt debounced");
        return None;
    }

    info!(pair = %pair, price = %price, readings = ?readings, "Entry signal");
    position.baseline_price = Some(price);
    Some(Command {
        request: position.begin_request(),
        pair,
        action: Action::PlaceBuy {
            price,
            notional: ctx.trade.buy_amount,
        },
    })
}

/// Apply the venue's answer to a buy placement.
pub fn on_buy_placed(
    ctx: &StrategyContext,
    position: &mut Position,
    price: Price,
    result: Result<BuyPlacement, ExecutionError>,
    now: DateTime<Utc>,
) {
    let pair = position.pair().clone();
    let placement = match result {
        Ok(placement) => placement,
        Err(e) => {
            warn!(pair = %pair, error = %e, "Error placing buy order");
            position.baseline_price = None;
            return;
        }
    };

    ctx.notifiers.notify_all(Event::TradingStarted {
        pair: pair.clone(),
        price,
        quantity: placement.quantity,
    });

    position.open(price, ctx.trade.profit_target);

    let order = ctx.orders.create_order(
        &pair,
        placement.order_id,
        Side::Buy,
        price,
        placement.quantity,
        now,
    );

    if placement.filled {
        ctx.orders.mark_filled(&pair, &order.id);
        position.hold(order.amount);
        info!(pair = %pair, order_id = %order.id, "Buy order filled immediately");
        position.begin_sell_setup();
    } else {
        info!(pair = %pair, order_id = %order.id, "Buy order placed");
        position.await_buy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(rsi: f64, slow: f64, medium: f64, fast: f64) -> EntryReadings {
        EntryReadings {
            rsi,
            slow_stochastic: slow,
            medium_stochastic: medium,
            fast_stochastic: fast,
        }
    }

    #[test]
    fn deep_dip_enters() {
        let thresholds = EntryThresholds::default();
        assert!(readings(25.0, 40.0, 14.0, 10.0).should_enter(&thresholds));
    }

    #[test]
    fn sharp_dip_enters_with_shallower_medium() {
        let thresholds = EntryThresholds::default();
        assert!(readings(20.0, 40.0, 29.0, 10.0).should_enter(&thresholds));
        assert!(!readings(22.0, 40.0, 29.0, 10.0).should_enter(&thresholds));
    }

    #[test]
    fn slow_and_fast_bounds_gate_both_setups() {
        let thresholds = EntryThresholds::default();
        assert!(!readings(20.0, 45.0, 10.0, 10.0).should_enter(&thresholds));
        assert!(!readings(20.0, 40.0, 10.0, 20.0).should_enter(&thresholds));
    }

    #[test]
    fn missing_rsi_never_enters() {
        let thresholds = EntryThresholds::default();
        assert!(!readings(f64::NAN, 10.0, 5.0, 5.0).should_enter(&thresholds));
    }
}
