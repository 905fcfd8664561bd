//! [`Exchange`] with scripted results and a call log.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{Amount, OrderId, PairId, Price};
use crate::error::ExecutionError;
use crate::port::{BuyPlacement, Exchange, SellPlacement};

/// Amounts are truncated to this many decimal places.
pub const AMOUNT_SCALE: u32 = 4;

/// A venue call as received.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeCall {
    Buy { price: Price, notional: Decimal },
    Sell { price: Price, amount: Amount },
    Cancel { order_id: OrderId },
}

/// Each placement pops the next scripted result; when the queue is empty the
/// order is accepted unfilled with a generated id (`buy-1`, `sell-1`, ...).
/// Cancels succeed unless a failure was scripted.
pub struct ScriptedExchange {
    buy_results: Mutex<VecDeque<Result<BuyPlacement, ExecutionError>>>,
    sell_results: Mutex<VecDeque<Result<SellPlacement, ExecutionError>>>,
    cancel_results: Mutex<VecDeque<Result<(), ExecutionError>>>,
    calls: Mutex<Vec<ExchangeCall>>,
    next_id: AtomicU32,
}

impl ScriptedExchange {
    pub fn new() -> Self {
        Self {
            buy_results: Mutex::new(VecDeque::new()),
            sell_results: Mutex::new(VecDeque::new()),
            cancel_results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            next_id: AtomicU32::new(1),
        }
    }

    pub fn push_buy(&self, result: Result<BuyPlacement, ExecutionError>) {
        self.buy_results.lock().unwrap().push_back(result);
    }

    pub fn push_sell(&self, result: Result<SellPlacement, ExecutionError>) {
        self.sell_results.lock().unwrap().push_back(result);
    }

    pub fn push_cancel(&self, result: Result<(), ExecutionError>) {
        self.cancel_results.lock().unwrap().push_back(result);
    }

    /// Script a rejection of the next buy.
    pub fn reject_next_buy(&self, pair: &PairId) {
        self.push_buy(Err(ExecutionError::Rejected {
            pair: pair.clone(),
            reason: "scripted".into(),
        }));
    }

    pub fn calls(&self) -> Vec<ExchangeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn buy_count(&self) -> usize {
        self.count(|c| matches!(c, ExchangeCall::Buy { .. }))
    }

    pub fn sell_count(&self) -> usize {
        self.count(|c| matches!(c, ExchangeCall::Sell { .. }))
    }

    pub fn cancel_count(&self) -> usize {
        self.count(|c| matches!(c, ExchangeCall::Cancel { .. }))
    }

    fn count(&self, pred: impl Fn(&ExchangeCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn generate_id(&self, prefix: &str) -> OrderId {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        OrderId::new(format!("{prefix}-{n}"))
    }
}

impl Default for ScriptedExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Exchange for ScriptedExchange {
    async fn create_buy_order(
        &self,
        _pair: &PairId,
        price: Price,
        notional: Decimal,
    ) -> Result<BuyPlacement, ExecutionError> {
        self.calls
            .lock()
            .unwrap()
            .push(ExchangeCall::Buy { price, notional });
        let scripted = self.buy_results.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            let quantity = (notional / price)
                .round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::ToZero);
            Ok(BuyPlacement {
                order_id: self.generate_id("buy"),
                quantity,
                filled: false,
            })
        })
    }

    async fn create_sell_order(
        &self,
        _pair: &PairId,
        price: Price,
        amount: Amount,
    ) -> Result<SellPlacement, ExecutionError> {
        self.calls
            .lock()
            .unwrap()
            .push(ExchangeCall::Sell { price, amount });
        let scripted = self.sell_results.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(SellPlacement {
                order_id: self.generate_id("sell"),
                filled: false,
            })
        })
    }

    async fn cancel_order(&self, _pair: &PairId, order_id: &OrderId) -> Result<(), ExecutionError> {
        self.calls.lock().unwrap().push(ExchangeCall::Cancel {
            order_id: order_id.clone(),
        });
        let scripted = self.cancel_results.lock().unwrap().pop_front();
        scripted.unwrap_or(Ok(()))
    }

    fn normalize_amount(&self, _pair: &PairId, amount: Amount) -> Amount {
        amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::ToZero)
    }

    fn exchange_name(&self) -> &'static str {
        "scripted"
    }
}
