//! Market-wide signals shared by every pair.

use std::sync::atomic::{AtomicBool, Ordering};

use rust_decimal::Decimal;

use crate::domain::Amount;

/// Read-only (from the state machine's point of view) global signals.
pub struct MarketSignals {
    /// Market-wide risk flag; forces stale buy orders to be cancelled early.
    danger_zone: AtomicBool,
    /// Smallest quote notional the venue accepts for an order.
    min_trade_amount: Amount,
}

impl MarketSignals {
    #[must_use]
    pub fn new(min_trade_amount: Amount) -> Self {
        Self {
            danger_zone: AtomicBool::new(false),
            min_trade_amount,
        }
    }

    #[must_use]
    pub fn is_danger_zone(&self) -> bool {
        self.danger_zone.load(Ordering::SeqCst)
    }

    /// Raise or clear the danger-zone flag. Called by the market analysis
    /// that owns it.
    pub fn set_danger_zone(&self, active: bool) {
        self.danger_zone.store(active, Ordering::SeqCst);
    }

    #[must_use]
    pub fn min_trade_amount(&self) -> Amount {
        self.min_trade_amount
    }
}

impl Default for MarketSignals {
    fn default() -> Self {
        Self::new(Decimal::new(1, 3))
    }
}
