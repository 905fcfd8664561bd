//! Execution commands and their completions.
//!
//! A tick never awaits the venue. When the state machine decides to act it
//! returns a [`Command`]: an immutable snapshot of everything the call needs.
//! Whoever runs the command hands the resulting [`Completion`] back to the
//! same pair's engine, which applies it on the pair's own timeline.

use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::{Amount, Order, OrderId, PairId, Price, RequestId};
use crate::error::ExecutionError;
use crate::port::{BuyPlacement, Exchange, SellPlacement};

/// The venue call to make.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Open a position.
    PlaceBuy { price: Price, notional: Decimal },
    /// Give up on a stale buy order, as observed when cancellation was
    /// decided.
    CancelBuy { order: Order },
    /// Offer the held amount at the sell target.
    PlaceSell { price: Price, amount: Amount },
    /// Cancel the current sell order (if any) and offer again.
    RecreateSell {
        replace: Option<OrderId>,
        price: Price,
        amount: Amount,
    },
    /// Withdraw a sell order that outlived its trade.
    CancelSell { order_id: OrderId },
}

/// An execution call issued by a pair's engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub request: RequestId,
    pub pair: PairId,
    pub action: Action,
}

/// Result of a [`Command`], carrying the inputs it was issued with.
#[derive(Debug, Clone)]
pub enum Completion {
    BuyPlaced {
        request: RequestId,
        price: Price,
        notional: Decimal,
        result: Result<BuyPlacement, ExecutionError>,
    },
    BuyCanceled {
        request: RequestId,
        order: Order,
        result: Result<(), ExecutionError>,
    },
    SellPlaced {
        request: RequestId,
        price: Price,
        amount: Amount,
        result: Result<SellPlacement, ExecutionError>,
    },
    SellRecreated {
        request: RequestId,
        replaced: Option<OrderId>,
        price: Price,
        amount: Amount,
        result: Result<SellPlacement, ExecutionError>,
    },
    SellCanceled {
        request: RequestId,
        order_id: OrderId,
        result: Result<(), ExecutionError>,
    },
}

impl Completion {
    #[must_use]
    pub fn request(&self) -> RequestId {
        match self {
            Completion::BuyPlaced { request, .. }
            | Completion::BuyCanceled { request, .. }
            | Completion::SellPlaced { request, .. }
            | Completion::SellRecreated { request, .. }
            | Completion::SellCanceled { request, .. } => *request,
        }
    }
}

impl Command {
    /// Run the venue call and package its result.
    ///
    /// Sell recreation cancels first; a failed cancel is logged and the new
    /// order is placed regardless.
    pub async fn execute(self, exchange: &dyn Exchange) -> Completion {
        let Command {
            request,
            pair,
            action,
        } = self;

        match action {
            Action::PlaceBuy { price, notional } => Completion::BuyPlaced {
                request,
                price,
                notional,
                result: exchange.create_buy_order(&pair, price, notional).await,
            },
            Action::CancelBuy { order } => {
                let result = exchange.cancel_order(&pair, &order.id).await;
                Completion::BuyCanceled {
                    request,
                    order,
                    result,
                }
            }
            Action::PlaceSell { price, amount } => Completion::SellPlaced {
                request,
                price,
                amount,
                result: exchange.create_sell_order(&pair, price, amount).await,
            },
            Action::RecreateSell {
                replace,
                price,
                amount,
            } => {
                if let Some(order_id) = &replace {
                    if let Err(e) = exchange.cancel_order(&pair, order_id).await {
                        warn!(
                            pair = %pair,
                            order_id = %order_id,
                            error = %e,
                            "Error canceling sell order"
                        );
                    }
                }
                Completion::SellRecreated {
                    request,
                    replaced: replace,
                    price,
                    amount,
                    result: exchange.create_sell_order(&pair, price, amount).await,
                }
            }
            Action::CancelSell { order_id } => {
                let result = exchange.cancel_order(&pair, &order_id).await;
                Completion::SellCanceled {
                    request,
                    order_id,
                    result,
                }
            }
        }
    }
}
