//! Per-pair trading state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    quote, Amount, Debounce, Order, PairId, Phase, Price, RequestId, WarningLatch,
};

/// Two-tier stop-loss thresholds, both below the entry price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopLoss {
    /// Price at which the stop activates.
    pub stop_price: Price,
    /// Price the position is then offered at.
    pub sell_price: Price,
}

impl StopLoss {
    /// Derive both thresholds from the entry price and the strategy's
    /// maximum loss fraction. The stop activates at 90% of the loss.
    #[must_use]
    pub fn from_entry(entry_price: Price, max_loss: Decimal) -> Self {
        let activation = max_loss * Decimal::new(9, 1);
        Self {
            stop_price: quote(entry_price * (Decimal::ONE - activation)),
            sell_price: quote(entry_price * (Decimal::ONE - max_loss)),
        }
    }
}

/// Everything the state machine knows about one pair.
///
/// Long-lived: one per instrument for the whole process, reset (not
/// replaced) when a trade cycle completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pair: PairId,
    phase: Phase,
    /// Last time the validity gate evaluated this pair.
    pub last_valid_check: Option<DateTime<Utc>>,
    pub buy_retry: Debounce,
    pub sell_retry: Debounce,
    pub warning: WarningLatch,
    pub entry_price: Price,
    pub sell_target: Price,
    /// Base quantity still to liquidate.
    amount_to_sell: Amount,
    /// Quantity of the current sell order already deducted from
    /// `amount_to_sell`.
    sold_accounted: Amount,
    pub stop_loss: Option<StopLoss>,
    pub force_sell: bool,
    /// Close the current entry attempt was priced from. Cleared when the buy
    /// fails or the cycle resets.
    pub baseline_price: Option<Price>,
    in_flight: Option<RequestId>,
}

impl Position {
    #[must_use]
    pub fn new(pair: PairId) -> Self {
        Self {
            pair,
            phase: Phase::Invalid,
            last_valid_check: None,
            buy_retry: Debounce::new(),
            sell_retry: Debounce::new(),
            warning: WarningLatch::default(),
            entry_price: Decimal::ZERO,
            sell_target: Decimal::ZERO,
            amount_to_sell: Decimal::ZERO,
            sold_accounted: Decimal::ZERO,
            stop_loss: None,
            force_sell: false,
            baseline_price: None,
            in_flight: None,
        }
    }

    #[must_use]
    pub fn pair(&self) -> &PairId {
        &self.pair
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn amount_to_sell(&self) -> Amount {
        self.amount_to_sell
    }

    /// True while an execution call for this pair is outstanding.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    // --- transitions -----------------------------------------------------

    /// Gate accepted the pair.
    pub fn become_valid(&mut self) {
        self.transition(Phase::Validating);
    }

    /// Gate rejected the pair.
    pub fn become_invalid(&mut self) {
        self.transition(Phase::Invalid);
    }

    /// A buy order was placed and is resting.
    pub fn await_buy(&mut self) {
        self.warning.clear();
        self.transition(Phase::AwaitingBuy);
    }

    /// The buy order went away with nothing bought.
    pub fn abandon_buy(&mut self) {
        self.transition(Phase::Validating);
    }

    /// Base asset is held and must be offered.
    pub fn begin_sell_setup(&mut self) {
        self.transition(Phase::SettingUpSell);
    }

    /// A sell order is resting; arm the stop loss.
    pub fn manage_sell(&mut self, stop_loss: StopLoss) {
        self.stop_loss = Some(stop_loss);
        self.warning.clear();
        self.transition(Phase::ManagingSell);
    }

    /// Sell order gone unexpectedly; place it again.
    pub fn lose_sell_order(&mut self) {
        self.transition(Phase::SettingUpSell);
    }

    /// Everything sold.
    pub fn finish(&mut self) {
        self.transition(Phase::Finished);
    }

    /// Start a fresh trade cycle while keeping gate bookkeeping.
    pub fn reset(&mut self) {
        self.buy_retry.clear();
        self.sell_retry.clear();
        self.warning.clear();
        self.entry_price = Decimal::ZERO;
        self.sell_target = Decimal::ZERO;
        self.amount_to_sell = Decimal::ZERO;
        self.sold_accounted = Decimal::ZERO;
        self.stop_loss = None;
        self.force_sell = false;
        self.baseline_price = None;
        self.transition(Phase::Validating);
    }

    fn transition(&mut self, to: Phase) {
        if self.phase != to {
            debug!(pair = %self.pair, from = %self.phase, to = %to, "Phase transition");
        }
        self.phase = to;
    }

    // --- trade parameters ------------------------------------------------

    /// Fix entry price and profit target for a newly opened position.
    pub fn open(&mut self, entry_price: Price, profit_target: Decimal) {
        self.entry_price = entry_price;
        self.sell_target = quote(entry_price * (Decimal::ONE + profit_target));
    }

    /// Set the quantity to liquidate once the buy side has resolved.
    pub fn hold(&mut self, amount: Amount) {
        self.amount_to_sell = amount.max(Decimal::ZERO);
        self.sold_accounted = Decimal::ZERO;
    }

    /// A new sell order replaced the previous one.
    pub fn track_new_sell_order(&mut self) {
        self.sold_accounted = Decimal::ZERO;
    }

    /// Deduct a completed sale from the quantity to liquidate.
    pub fn record_sold(&mut self, amount: Amount) {
        self.amount_to_sell = (self.amount_to_sell - amount).max(Decimal::ZERO);
    }

    /// Deduct whatever part of `order` executed since last observed.
    pub fn accrue_sell_fill(&mut self, order: &Order) {
        let filled = order.filled_amount();
        if filled > self.sold_accounted {
            self.record_sold(filled - self.sold_accounted);
            self.sold_accounted = filled;
        }
    }

    // --- in-flight requests ----------------------------------------------

    /// Mark an execution call as outstanding.
    pub fn begin_request(&mut self) -> RequestId {
        let id = RequestId::new();
        self.in_flight = Some(id);
        id
    }

    /// Clear the outstanding call if `id` is the one in flight.
    ///
    /// Returns `false` for stale or unknown completions.
    pub fn complete_request(&mut self, id: RequestId) -> bool {
        if self.in_flight == Some(id) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }
}
