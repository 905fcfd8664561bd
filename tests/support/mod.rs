//! Helpers shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use dipcatch::application::{Command, PairEngine};
use dipcatch::config::{StrategyConfig, TimingConfig};
use dipcatch::domain::{OrderId, Position, Side, StopLoss};
use dipcatch::port::OrderStore;
use dipcatch::testkit::Harness;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

/// Execute `command` against the harness exchange and feed the completion
/// back at `now`. Returns any follow-up command.
pub async fn run(
    h: &Harness,
    engine: &mut PairEngine,
    command: Command,
    now: DateTime<Utc>,
) -> Option<Command> {
    let completion = command.execute(h.exchange.as_ref()).await;
    engine.complete(completion, now)
}

pub fn harness_with_buy_amount(buy_amount: Decimal) -> Harness {
    let strategy = StrategyConfig {
        buy_amount,
        ..StrategyConfig::default()
    };
    Harness::with_config(&strategy, &TimingConfig::default())
}

/// An engine already managing a resting sell order `sell-0` of `amount` at
/// `order_price`, for a position entered at 100 with a 101 target.
pub fn managing_sell(h: &Harness, order_price: Decimal, amount: Decimal) -> PairEngine {
    let mut position = Position::new(h.pair.clone());
    position.open(dec!(100), dec!(0.01));
    position.hold(dec!(1));
    position.manage_sell(StopLoss::from_entry(dec!(100), dec!(0.05)));
    h.orders.create_order(
        &h.pair,
        OrderId::from("sell-0"),
        Side::Sell,
        order_price,
        amount,
        t0(),
    );
    // Close above the stop so only drift and force-sell matter.
    h.market.set_last_close(&h.pair, 100.0);
    PairEngine::with_position(position, h.ctx.clone())
}
