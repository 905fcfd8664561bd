//! One-shot operator warnings keyed by the condition that raised them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::OrderId;

/// A condition the operator must be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// The bought part of a buy order is too small to be sold on its own,
    /// so the order cannot be cancelled.
    UnsellablePartialFill { order_id: OrderId, part_fill: Decimal },
}

/// Remembers the last condition notified so an unchanged condition is not
/// repeated every tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningLatch {
    last: Option<Warning>,
}

impl WarningLatch {
    /// Returns `true` if `warning` differs from the last notified condition,
    /// and latches it.
    pub fn should_notify(&mut self, warning: &Warning) -> bool {
        if self.last.as_ref() == Some(warning) {
            return false;
        }
        self.last = Some(warning.clone());
        true
    }

    /// Forget the latched condition.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn unsellable(part_fill: Decimal) -> Warning {
        Warning::UnsellablePartialFill {
            order_id: OrderId::from("buy-1"),
            part_fill,
        }
    }

    #[test]
    fn same_condition_notifies_once() {
        let mut latch = WarningLatch::default();
        assert!(latch.should_notify(&unsellable(dec!(0.1))));
        assert!(!latch.should_notify(&unsellable(dec!(0.1))));
    }

    #[test]
    fn changed_condition_notifies_again() {
        let mut latch = WarningLatch::default();
        assert!(latch.should_notify(&unsellable(dec!(0.1))));
        assert!(latch.should_notify(&unsellable(dec!(0.2))));
        latch.clear();
        assert!(latch.should_notify(&unsellable(dec!(0.2))));
    }
}
