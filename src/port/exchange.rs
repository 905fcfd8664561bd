//! Execution venue port.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Amount, OrderId, PairId, Price};
use crate::error::ExecutionError;

/// Venue acknowledgement of a buy order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyPlacement {
    pub order_id: OrderId,
    /// Base quantity the notional bought (or will buy) at the limit price.
    pub quantity: Amount,
    /// Executed in full on placement.
    pub filled: bool,
}

/// Venue acknowledgement of a sell order.
#[derive(Debug, Clone, PartialEq)]
pub struct SellPlacement {
    pub order_id: OrderId,
    pub filled: bool,
}

/// Order placement and cancellation on the venue.
///
/// Calls may take arbitrarily long; the state machine never awaits them on
/// the tick path.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Place a limit buy spending `notional` quote currency at `price`.
    async fn create_buy_order(
        &self,
        pair: &PairId,
        price: Price,
        notional: Decimal,
    ) -> Result<BuyPlacement, ExecutionError>;

    /// Place a limit sell of `amount` base currency at `price`.
    async fn create_sell_order(
        &self,
        pair: &PairId,
        price: Price,
        amount: Amount,
    ) -> Result<SellPlacement, ExecutionError>;

    /// Cancel an open order.
    async fn cancel_order(&self, pair: &PairId, order_id: &OrderId) -> Result<(), ExecutionError>;

    /// Round `amount` down to the venue's tradeable step for `pair`.
    fn normalize_amount(&self, pair: &PairId, amount: Amount) -> Amount;

    /// Get the exchange name for logging/debugging.
    fn exchange_name(&self) -> &'static str;
}
