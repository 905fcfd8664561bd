//! Order bookkeeping port.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Amount, Order, OrderId, PairId, Price, Side};

/// Registry of the orders the state machine placed.
///
/// Fill progress is written by whatever follows the venue's order updates
/// through [`record_fill`](Self::record_fill); the state machine only reads
/// it and flips the open/cancelled flags.
pub trait OrderStore: Send + Sync {
    /// The open (`waiting`) order of `side` for `pair`, if any.
    fn order(&self, pair: &PairId, side: Side) -> Option<Order>;

    /// Look up any order by id, open or not.
    fn get(&self, pair: &PairId, order_id: &OrderId) -> Option<Order>;

    /// Register a freshly placed order as open and unfilled.
    fn create_order(
        &self,
        pair: &PairId,
        order_id: OrderId,
        side: Side,
        price: Price,
        amount: Amount,
        created_at: DateTime<Utc>,
    ) -> Order;

    /// Mark fully executed and closed.
    fn mark_filled(&self, pair: &PairId, order_id: &OrderId);

    /// Mark closed without touching fill state.
    fn mark_resolved(&self, pair: &PairId, order_id: &OrderId);

    /// Mark cancelled and closed.
    fn mark_canceled(&self, pair: &PairId, order_id: &OrderId);

    /// Update the filled fraction reported by the venue.
    ///
    /// Returns `false` if the order is unknown.
    fn record_fill(&self, pair: &PairId, order_id: &OrderId, part_fill: Decimal) -> bool;
}
