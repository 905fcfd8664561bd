//! Order supervision: the buy order while it rests, then the sell order
//! until the position is flat.
//!
//! Each `supervise_*`/`setup_*` function runs on a tick and may issue one
//! [`Command`]; each `on_*` function applies that command's completion.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::application::command::{Action, Command};
use crate::application::context::StrategyContext;
use crate::domain::{
    elapsed, last_close, price_from_f64, quote, Amount, Order, OrderId, Phase, Position, Price,
    Side, StopLoss, Timeframe, Warning,
};
use crate::error::ExecutionError;
use crate::port::{Event, SellPlacement};

/// [`Phase::AwaitingBuy`]: cancel the buy order once it is stale.
///
/// Stale means older than the buy timeout, or any age while the danger-zone
/// flag is up. A partly filled order whose bought part is below the venue
/// minimum cannot be cancelled (the bought part could never be sold), so the
/// operator is warned once and the order keeps resting.
pub fn supervise_buy(
    ctx: &StrategyContext,
    position: &mut Position,
    now: DateTime<Utc>,
) -> Option<Command> {
    let pair = position.pair().clone();
    let Some(order) = ctx.orders.order(&pair, Side::Buy) else {
        info!(pair = %pair, "Buy order no longer open");
        position.abandon_buy();
        return None;
    };

    let timed_out = elapsed(order.timestamp, now, ctx.timing.buy_timeout);
    let danger_zone = ctx.signals.is_danger_zone();
    if !timed_out && !danger_zone {
        return None;
    }

    let bought_part = order.is_partially_filled();
    let enough_for_new_order =
        order.part_fill * ctx.trade.buy_amount >= ctx.signals.min_trade_amount();

    if bought_part && !enough_for_new_order {
        let warning = Warning::UnsellablePartialFill {
            order_id: order.id.clone(),
            part_fill: order.part_fill,
        };
        if position.warning.should_notify(&warning) {
            warn!(
                pair = %pair,
                order_id = %order.id,
                part_fill = %order.part_fill,
                "Can't cancel buy order, bought amount too small to sell"
            );
            ctx.notifiers.notify_all(Event::Warning {
                pair: pair.clone(),
                warning,
            });
        }
        return None;
    }

    info!(
        pair = %pair,
        order_id = %order.id,
        part_fill = %order.part_fill,
        timed_out,
        danger_zone,
        "Canceling buy order"
    );
    Some(Command {
        request: position.begin_request(),
        pair,
        action: Action::CancelBuy { order },
    })
}

/// Apply a buy cancellation.
///
/// The latest stored fill wins over the one observed when cancelling.
pub fn on_buy_canceled(
    ctx: &StrategyContext,
    position: &mut Position,
    observed: Order,
    result: Result<(), ExecutionError>,
) {
    let pair = position.pair().clone();
    if let Err(e) = result {
        warn!(pair = %pair, order_id = %observed.id, error = %e, "Error canceling buy order");
        return;
    }

    let order = ctx.orders.get(&pair, &observed.id).unwrap_or(observed);
    ctx.orders.mark_canceled(&pair, &order.id);
    ctx.notifiers.notify_all(Event::BuyCanceled {
        pair: pair.clone(),
        order_id: order.id.clone(),
        part_fill: order.part_fill,
    });

    if position.phase() != Phase::AwaitingBuy {
        debug!(pair = %pair, phase = %position.phase(), "Buy already resolved before cancel completed");
        return;
    }

    if order.is_partially_filled() {
        let bought = ctx.exchange.normalize_amount(&pair, order.filled_amount());
        info!(pair = %pair, bought = %bought, "Buy order canceled after partial fill");
        position.hold(bought);
        position.begin_sell_setup();
    } else {
        info!(pair = %pair, "Buy order canceled unfilled");
        position.buy_retry.clear();
        position.abandon_buy();
    }
}

/// [`Phase::SettingUpSell`]: offer the held amount at the sell target.
pub fn setup_sell(ctx: &StrategyContext, position: &mut Position) -> Option<Command> {
    let pair = position.pair().clone();
    let amount = position.amount_to_sell();
    if amount.is_zero() {
        warn!(pair = %pair, "Nothing left to sell");
        position.finish();
        return None;
    }

    let price = quote(position.sell_target);
    debug!(pair = %pair, price = %price, amount = %amount, exchange = ctx.exchange.exchange_name(), "Placing sell order");
    Some(Command {
        request: position.begin_request(),
        pair,
        action: Action::PlaceSell { price, amount },
    })
}

/// Apply a first sell placement.
pub fn on_sell_placed(
    ctx: &StrategyContext,
    position: &mut Position,
    price: Price,
    amount: Amount,
    result: Result<SellPlacement, ExecutionError>,
    now: DateTime<Utc>,
) {
    let pair = position.pair().clone();
    let placement = match result {
        Ok(placement) => placement,
        Err(e) => {
            warn!(pair = %pair, error = %e, "Error placing sell order");
            return;
        }
    };

    let order = ctx
        .orders
        .create_order(&pair, placement.order_id, Side::Sell, price, amount, now);
    position.track_new_sell_order();

    if placement.filled {
        ctx.orders.mark_filled(&pair, &order.id);
        position.record_sold(order.amount);
        info!(pair = %pair, order_id = %order.id, "Sell order filled immediately");
        position.finish();
    } else {
        let stop_loss = StopLoss::from_entry(position.entry_price, ctx.trade.max_loss);
        info!(
            pair = %pair,
            order_id = %order.id,
            price = %price,
            stop_price = %stop_loss.stop_price,
            "Sell order placed"
        );
        position.manage_sell(stop_loss);
    }
}

/// [`Phase::ManagingSell`]: keep the resting sell order in line with the
/// position.
///
/// In order of precedence: a force-sell request recreates unconditionally;
/// price or amount drift recreates (debounced); otherwise the stop-loss
/// policy may ask for a recreation.
pub fn manage_sell(
    ctx: &StrategyContext,
    position: &mut Position,
    now: DateTime<Utc>,
) -> Option<Command> {
    let pair = position.pair().clone();
    let order = ctx.orders.order(&pair, Side::Sell);

    if position.force_sell {
        position.force_sell = false;
        info!(pair = %pair, "Force sell requested");
        return Some(recreate(position, order.map(|o| o.id)));
    }

    let Some(order) = order else {
        info!(pair = %pair, "Sell order no longer open");
        position.lose_sell_order();
        return None;
    };

    let price_drift = quote(order.price) != quote(position.sell_target);
    let to_sell = ctx.exchange.normalize_amount(&pair, position.amount_to_sell());
    let resting = ctx.exchange.normalize_amount(&pair, order.remaining_amount());

    if price_drift || to_sell > resting {
        if !position.sell_retry.try_acquire(now, ctx.timing.sell_retry) {
            debug!(pair = %pair, "Sell recreation debounced");
            return None;
        }
        info!(
            pair = %pair,
            order_price = %order.price,
            sell_target = %position.sell_target,
            to_sell = %to_sell,
            resting = %resting,
            "Sell order out of date"
        );
        return Some(recreate(position, Some(order.id)));
    }

    let chart = ctx.market.chart(&pair, Timeframe::FiveMinutes);
    let last_close = last_close(&chart).and_then(price_from_f64)?;

    if ctx.hooks.manage_stop_loss(position, last_close) {
        ctx.notifiers.notify_all(Event::StopLossActivated {
            pair: pair.clone(),
            last_close,
            sell_price: position.sell_target,
        });
        return Some(recreate(position, Some(order.id)));
    }

    None
}

fn recreate(position: &mut Position, replace: Option<OrderId>) -> Command {
    Command {
        request: position.begin_request(),
        pair: position.pair().clone(),
        action: Action::RecreateSell {
            replace,
            price: quote(position.sell_target),
            amount: position.amount_to_sell(),
        },
    }
}

/// Apply a sell recreation.
///
/// The replaced order is closed whether or not its cancel succeeded. A new
/// order that lands after the trade already finished is closed locally and
/// withdrawn from the venue with a follow-up [`Action::CancelSell`].
pub fn on_sell_recreated(
    ctx: &StrategyContext,
    position: &mut Position,
    replaced: Option<OrderId>,
    price: Price,
    amount: Amount,
    result: Result<SellPlacement, ExecutionError>,
    now: DateTime<Utc>,
) -> Option<Command> {
    let pair = position.pair().clone();

    if let Some(order_id) = replaced {
        if let Some(old) = ctx.orders.get(&pair, &order_id) {
            position.accrue_sell_fill(&old);
        }
        ctx.orders.mark_canceled(&pair, &order_id);
    }

    let placement = match result {
        Ok(placement) => placement,
        Err(e) => {
            warn!(pair = %pair, error = %e, "Error creating sell order");
            return None;
        }
    };

    let order = ctx
        .orders
        .create_order(&pair, placement.order_id, Side::Sell, price, amount, now);

    if position.phase() != Phase::ManagingSell {
        if placement.filled {
            ctx.orders.mark_filled(&pair, &order.id);
            warn!(pair = %pair, phase = %position.phase(), order_id = %order.id, amount = %amount, "Sell order recreated and filled after trade finished");
            return None;
        }
        ctx.orders.mark_canceled(&pair, &order.id);
        warn!(pair = %pair, phase = %position.phase(), order_id = %order.id, "Sell order recreated after trade finished, canceling");
        return Some(Command {
            request: position.begin_request(),
            pair,
            action: Action::CancelSell { order_id: order.id },
        });
    }

    position.track_new_sell_order();
    if placement.filled {
        ctx.orders.mark_filled(&pair, &order.id);
        position.record_sold(order.amount);
        info!(pair = %pair, order_id = %order.id, "Recreated sell order filled immediately");
        position.finish();
    } else {
        info!(pair = %pair, order_id = %order.id, price = %price, amount = %amount, "Sell order recreated");
    }
    None
}

/// Apply the withdrawal of a leftover sell order. The order was already
/// closed locally when the withdrawal was issued.
pub fn on_sell_canceled(
    position: &Position,
    order_id: &OrderId,
    result: Result<(), ExecutionError>,
) {
    match result {
        Ok(()) => debug!(pair = %position.pair(), order_id = %order_id, "Leftover sell order canceled"),
        Err(e) => warn!(pair = %position.pair(), order_id = %order_id, error = %e, "Error canceling leftover sell order"),
    }
}
