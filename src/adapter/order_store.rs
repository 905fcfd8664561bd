//! In-memory order registry.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::{Amount, Order, OrderId, PairId, Price, Side};
use crate::port::OrderStore;

/// Process-local [`OrderStore`].
///
/// Keeps every order ever placed per pair. Registering a new order closes
/// any order of the same side that is still open, so each side has at most
/// one open order.
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: RwLock<HashMap<PairId, Vec<Order>>>,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open orders for `pair` on `side`.
    #[must_use]
    pub fn open_count(&self, pair: &PairId, side: Side) -> usize {
        self.orders
            .read()
            .get(pair)
            .map(|orders| {
                orders
                    .iter()
                    .filter(|o| o.side == side && o.waiting)
                    .count()
            })
            .unwrap_or(0)
    }

    fn update(&self, pair: &PairId, order_id: &OrderId, f: impl FnOnce(&mut Order)) -> bool {
        let mut orders = self.orders.write();
        match orders
            .get_mut(pair)
            .and_then(|list| list.iter_mut().find(|o| &o.id == order_id))
        {
            Some(order) => {
                f(order);
                true
            }
            None => {
                warn!(pair = %pair, order_id = %order_id, "Unknown order");
                false
            }
        }
    }
}

impl OrderStore for MemoryOrderStore {
    fn order(&self, pair: &PairId, side: Side) -> Option<Order> {
        self.orders
            .read()
            .get(pair)?
            .iter()
            .rev()
            .find(|o| o.side == side && o.waiting)
            .cloned()
    }

    fn get(&self, pair: &PairId, order_id: &OrderId) -> Option<Order> {
        self.orders
            .read()
            .get(pair)?
            .iter()
            .find(|o| &o.id == order_id)
            .cloned()
    }

    fn create_order(
        &self,
        pair: &PairId,
        order_id: OrderId,
        side: Side,
        price: Price,
        amount: Amount,
        created_at: DateTime<Utc>,
    ) -> Order {
        let order = Order::new(order_id, side, price, amount, created_at);
        let mut orders = self.orders.write();
        let list = orders.entry(pair.clone()).or_default();
        for stale in list.iter_mut().filter(|o| o.side == side && o.waiting) {
            debug!(pair = %pair, order_id = %stale.id, side = %side, "Closing superseded order");
            stale.waiting = false;
        }
        list.push(order.clone());
        order
    }

    fn mark_filled(&self, pair: &PairId, order_id: &OrderId) {
        self.update(pair, order_id, Order::fill);
    }

    fn mark_resolved(&self, pair: &PairId, order_id: &OrderId) {
        self.update(pair, order_id, |o| o.waiting = false);
    }

    fn mark_canceled(&self, pair: &PairId, order_id: &OrderId) {
        self.update(pair, order_id, Order::cancel);
    }

    fn record_fill(&self, pair: &PairId, order_id: &OrderId, part_fill: Decimal) -> bool {
        let part_fill = part_fill.clamp(Decimal::ZERO, Decimal::ONE);
        self.update(pair, order_id, |o| {
            if part_fill > o.part_fill {
                o.part_fill = part_fill;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pair() -> PairId {
        PairId::from("ETHBTC")
    }

    #[test]
    fn new_order_supersedes_open_order_of_same_side() {
        let store = MemoryOrderStore::new();
        let now = Utc::now();
        store.create_order(&pair(), OrderId::from("s1"), Side::Sell, dec!(1), dec!(2), now);
        store.create_order(&pair(), OrderId::from("b1"), Side::Buy, dec!(1), dec!(2), now);
        store.create_order(&pair(), OrderId::from("s2"), Side::Sell, dec!(1), dec!(2), now);

        assert_eq!(store.open_count(&pair(), Side::Sell), 1);
        assert_eq!(store.open_count(&pair(), Side::Buy), 1);
        assert_eq!(store.order(&pair(), Side::Sell).unwrap().id, OrderId::from("s2"));
        assert!(!store.get(&pair(), &OrderId::from("s1")).unwrap().waiting);
    }

    #[test]
    fn closed_orders_are_not_open() {
        let store = MemoryOrderStore::new();
        let id = OrderId::from("b1");
        store.create_order(&pair(), id.clone(), Side::Buy, dec!(1), dec!(2), Utc::now());

        store.mark_canceled(&pair(), &id);
        assert!(store.order(&pair(), Side::Buy).is_none());
        let order = store.get(&pair(), &id).unwrap();
        assert!(order.canceled);
    }

    #[test]
    fn fills_only_move_forward() {
        let store = MemoryOrderStore::new();
        let id = OrderId::from("s1");
        store.create_order(&pair(), id.clone(), Side::Sell, dec!(1), dec!(2), Utc::now());

        assert!(store.record_fill(&pair(), &id, dec!(0.5)));
        assert!(store.record_fill(&pair(), &id, dec!(0.2)));
        assert_eq!(store.get(&pair(), &id).unwrap().part_fill, dec!(0.5));

        assert!(store.record_fill(&pair(), &id, dec!(1.5)));
        let order = store.order(&pair(), Side::Sell).unwrap();
        assert!(order.is_filled());
        assert!(order.waiting);
    }

    #[test]
    fn unknown_order_fill_is_reported() {
        let store = MemoryOrderStore::new();
        assert!(!store.record_fill(&pair(), &OrderId::from("nope"), dec!(0.5)));
    }
}
