//! Exchange order records as seen by the state machine.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Amount, OrderId, Price};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

/// One outstanding (or recently resolved) exchange order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
    /// Filled fraction of `amount`, in `[0, 1]`.
    pub part_fill: Decimal,
    /// Still considered open by the state machine.
    pub waiting: bool,
    pub canceled: bool,
}

impl Order {
    /// A freshly registered, unfilled open order.
    #[must_use]
    pub fn new(
        id: OrderId,
        side: Side,
        price: Price,
        amount: Amount,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            side,
            price,
            amount,
            timestamp,
            part_fill: Decimal::ZERO,
            waiting: true,
            canceled: false,
        }
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.part_fill >= Decimal::ONE
    }

    #[must_use]
    pub fn is_partially_filled(&self) -> bool {
        self.part_fill > Decimal::ZERO
    }

    /// Base quantity executed so far.
    #[must_use]
    pub fn filled_amount(&self) -> Amount {
        self.amount * self.part_fill
    }

    /// Base quantity still resting on the book.
    #[must_use]
    pub fn remaining_amount(&self) -> Amount {
        self.amount * (Decimal::ONE - self.part_fill)
    }

    /// Mark fully executed and no longer open.
    pub fn fill(&mut self) {
        self.part_fill = Decimal::ONE;
        self.waiting = false;
    }

    /// Mark cancelled and no longer open.
    pub fn cancel(&mut self) {
        self.canceled = true;
        self.waiting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(amount: Decimal, part_fill: Decimal) -> Order {
        let mut order = Order::new(
            OrderId::from("1"),
            Side::Sell,
            dec!(100),
            amount,
            Utc::now(),
        );
        order.part_fill = part_fill;
        order
    }

    #[test]
    fn remaining_amount_excludes_filled_part() {
        let order = order(dec!(10), dec!(0.4));
        assert_eq!(order.filled_amount(), dec!(4.0));
        assert_eq!(order.remaining_amount(), dec!(6.0));
        assert!(order.is_partially_filled());
        assert!(!order.is_filled());
    }

    #[test]
    fn fill_and_cancel_close_the_order() {
        let mut filled = order(dec!(1), Decimal::ZERO);
        filled.fill();
        assert!(filled.is_filled());
        assert!(!filled.waiting);

        let mut canceled = order(dec!(1), Decimal::ZERO);
        canceled.cancel();
        assert!(canceled.canceled);
        assert!(!canceled.waiting);
        assert!(!canceled.is_filled());
    }
}
