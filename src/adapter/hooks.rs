//! Default stop-loss and trade completion behaviour.

use std::sync::Arc;

use tracing::info;

use crate::domain::{Position, Price};
use crate::port::{Event, NotifierRegistry, TradeHooks};

/// Two-tier stop loss and reset-on-finish.
///
/// Once the last close falls to the stop price, the sell target is lowered to
/// the stop's sell price. The stop fires once per trade: a target already at
/// or below the sell price is left alone.
pub struct StandardHooks {
    notifiers: Arc<NotifierRegistry>,
}

impl StandardHooks {
    #[must_use]
    pub fn new(notifiers: Arc<NotifierRegistry>) -> Self {
        Self { notifiers }
    }
}

impl TradeHooks for StandardHooks {
    fn manage_stop_loss(&self, position: &mut Position, last_close: Price) -> bool {
        let Some(stop) = position.stop_loss else {
            return false;
        };
        if last_close > stop.stop_price || position.sell_target <= stop.sell_price {
            return false;
        }
        position.sell_target = stop.sell_price;
        true
    }

    fn trade_finished(&self, position: &mut Position) {
        info!(
            pair = %position.pair(),
            entry = %position.entry_price,
            exit = %position.sell_target,
            "Trade cycle complete"
        );
        self.notifiers.notify_all(Event::TradeFinished {
            pair: position.pair().clone(),
            entry_price: position.entry_price,
            sell_target: position.sell_target,
        });
        position.reset();
    }
}
