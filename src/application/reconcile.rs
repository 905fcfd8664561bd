//! Fold venue-side fill progress into the position before dispatch.

use tracing::info;

use crate::application::context::StrategyContext;
use crate::domain::{Phase, Position, Side};

/// Apply observed fills. Idempotent: running it twice on the same order
/// state changes nothing the second time.
///
/// A filled buy moves [`Phase::AwaitingBuy`] on to selling; a filled sell
/// finishes the trade from any phase. Partial sell fills are deducted from
/// the amount still to sell.
pub fn reconcile(ctx: &StrategyContext, position: &mut Position) {
    let pair = position.pair().clone();

    if let Some(order) = ctx.orders.order(&pair, Side::Buy) {
        if order.is_filled() {
            if position.phase() == Phase::AwaitingBuy {
                info!(pair = %pair, order_id = %order.id, "Buy order filled");
                position.hold(order.amount);
                position.begin_sell_setup();
            }
            ctx.orders.mark_resolved(&pair, &order.id);
        }
    }

    if let Some(order) = ctx.orders.order(&pair, Side::Sell) {
        position.accrue_sell_fill(&order);
        if order.is_filled() {
            info!(pair = %pair, order_id = %order.id, "Sell order filled");
            position.finish();
            ctx.orders.mark_resolved(&pair, &order.id);
        }
    }
}
