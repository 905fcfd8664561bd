//! Strategy host callbacks.

use crate::domain::{Position, Price};

/// Decisions the surrounding strategy host owns.
pub trait TradeHooks: Send + Sync {
    /// Inspect the latest close against the position's stop-loss thresholds.
    ///
    /// Returning `true` asks for the sell order to be recreated. Implementors
    /// that activate a stop are expected to have lowered `sell_target`
    /// before returning.
    fn manage_stop_loss(&self, position: &mut Position, last_close: Price) -> bool;

    /// The trade cycle completed. Implementors reset the position for the
    /// next cycle.
    fn trade_finished(&self, position: &mut Position);
}
