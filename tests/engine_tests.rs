//! State machine behaviour driven tick by tick through a `PairEngine`.

mod support;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use dipcatch::application::{Action, Completion};
use dipcatch::domain::{Bar, OrderId, Phase, Position, RequestId, Side, StopLoss, Timeframe};
use dipcatch::port::{BuyPlacement, Event, OrderStore, SellPlacement};
use dipcatch::testkit::{ExchangeCall, Harness};

use support::{at, harness_with_buy_amount, managing_sell, run, t0};

/// Drive a fresh engine to `SettingUpSell` through a buy filled on
/// placement, holding 0.04 entered at 0.05.
async fn holding_after_instant_buy(h: &Harness) -> dipcatch::application::PairEngine {
    let mut engine = h.engine();
    h.indicators.signal_entry();
    h.exchange.push_buy(Ok(BuyPlacement {
        order_id: OrderId::from("buy-fast"),
        quantity: dec!(0.04),
        filled: true,
    }));
    let command = engine.tick(t0()).expect("buy");
    run(h, &mut engine, command, t0()).await;
    h.indicators.clear_entry();
    assert_eq!(engine.position().phase(), Phase::SettingUpSell);
    engine
}

/// Drive a fresh engine to `AwaitingBuy` with an unfilled `buy-1`.
async fn awaiting_buy(h: &Harness) -> dipcatch::application::PairEngine {
    let mut engine = h.engine();
    h.indicators.signal_entry();
    let command = engine.tick(t0()).expect("entry should buy");
    run(h, &mut engine, command, t0()).await;
    h.indicators.clear_entry();
    assert_eq!(engine.position().phase(), Phase::AwaitingBuy);
    engine
}

#[test]
fn eligible_pair_becomes_tradable_and_is_watched() {
    let h = Harness::new();
    let mut engine = h.engine();

    assert!(engine.tick(t0()).is_none());
    assert_eq!(engine.position().phase(), Phase::Validating);
    assert!(h.market.is_watched(&h.pair));
}

#[test]
fn stale_validation_charts_defer_the_gate() {
    let h = Harness::new();
    h.market.set_stale(true);
    let mut engine = h.engine();

    assert!(engine.tick(t0()).is_none());
    assert_eq!(engine.position().phase(), Phase::Invalid);
    assert!(engine.position().last_valid_check.is_none());

    h.market.set_stale(false);
    engine.tick(at(1));
    assert_eq!(engine.position().phase(), Phase::Validating);
}

#[test]
fn short_history_invalidates_without_redundant_watcher_removal() {
    let h = Harness::new();
    let mut engine = h.engine();
    engine.tick(t0());
    assert_eq!(engine.position().phase(), Phase::Validating);

    h.market
        .set_chart(&h.pair, Timeframe::OneHour, vec![Bar::flat(0.05, 1.0); 100]);
    engine.tick(at(61));
    assert_eq!(engine.position().phase(), Phase::Invalid);
    assert!(!h.market.is_watched(&h.pair));
    assert_eq!(h.market.watcher_removals(), 1);

    engine.tick(at(122));
    assert_eq!(engine.position().phase(), Phase::Invalid);
    assert_eq!(h.market.watcher_removals(), 1);
}

#[test]
fn gate_reentry_within_throttle_is_a_no_op() {
    let h = Harness::new();
    let mut engine = h.engine();
    engine.tick(t0());

    h.indicators.set_ineligible();
    engine.tick(at(30));
    assert_eq!(engine.position().phase(), Phase::Validating);
    assert_eq!(engine.position().last_valid_check, Some(t0()));

    engine.tick(at(60));
    assert_eq!(engine.position().phase(), Phase::Invalid);
}

#[test]
fn inactive_chart_updates_block_trading() {
    let h = Harness::new();
    let mut engine = h.engine();
    engine.tick(t0());

    h.market.set_updates_active(false);
    h.indicators.signal_entry();
    assert!(engine.tick(at(1)).is_none());
    assert_eq!(h.market.ensure_calls(), 1);

    h.market.set_updates_active(true);
    assert!(engine.tick(at(2)).is_some());
}

#[test]
fn entry_signal_issues_buy_at_last_close() {
    let h = Harness::new();
    let mut engine = h.engine();
    h.indicators.signal_entry();

    let command = engine.tick(t0()).expect("buy");
    assert_eq!(command.pair, h.pair);
    assert_eq!(
        command.action,
        Action::PlaceBuy {
            price: dec!(0.05),
            notional: dec!(0.002),
        }
    );
    assert!(engine.position().is_processing());
}

#[tokio::test]
async fn placed_buy_opens_position_and_notifies() {
    let h = Harness::new();
    let engine = awaiting_buy(&h).await;

    let position = engine.position();
    assert_eq!(position.entry_price, dec!(0.05));
    assert_eq!(position.sell_target, dec!(0.0505));
    assert!(!position.is_processing());

    let order = h.orders.order(&h.pair, Side::Buy).expect("open buy");
    assert_eq!(order.id, OrderId::from("buy-1"));
    assert_eq!(order.amount, dec!(0.04));
    assert_eq!(
        h.notifier
            .count(|e| matches!(e, Event::TradingStarted { .. })),
        1
    );
}

#[tokio::test]
async fn processing_blocks_new_commands() {
    let h = Harness::new();
    let mut engine = h.engine();
    h.indicators.signal_entry();

    let command = engine.tick(t0()).expect("buy");
    assert!(engine.tick(at(30)).is_none());
    assert!(engine.tick(at(600)).is_none());

    run(&h, &mut engine, command, at(601)).await;
    assert!(!engine.position().is_processing());
    assert_eq!(h.exchange.buy_count(), 1);
}

#[tokio::test]
async fn stale_completion_is_ignored() {
    let h = Harness::new();
    let mut engine = h.engine();
    h.indicators.signal_entry();
    let command = engine.tick(t0()).expect("buy");

    let follow_up = engine.complete(
        Completion::BuyPlaced {
            request: RequestId::new(),
            price: dec!(0.05),
            notional: dec!(0.002),
            result: Ok(BuyPlacement {
                order_id: OrderId::from("ghost"),
                quantity: dec!(0.04),
                filled: false,
            }),
        },
        t0(),
    );
    assert!(follow_up.is_none());
    assert!(engine.position().is_processing());
    assert_eq!(engine.position().phase(), Phase::Validating);
    assert!(h.orders.order(&h.pair, Side::Buy).is_none());

    run(&h, &mut engine, command, t0()).await;
    assert_eq!(engine.position().phase(), Phase::AwaitingBuy);
}

#[tokio::test]
async fn failed_buy_is_retried_after_debounce() {
    let h = Harness::new();
    let mut engine = h.engine();
    h.indicators.signal_entry();
    h.exchange.reject_next_buy(&h.pair);

    let command = engine.tick(t0()).expect("buy");
    assert_eq!(engine.position().baseline_price, Some(dec!(0.05)));
    run(&h, &mut engine, command, t0()).await;
    assert_eq!(engine.position().phase(), Phase::Validating);
    assert!(engine.position().baseline_price.is_none());

    assert!(engine.tick(at(5)).is_none());
    assert!(engine.tick(at(10)).is_some());
}

// Scenario E
#[tokio::test]
async fn immediately_filled_buy_skips_awaiting() {
    let h = Harness::new();
    let mut engine = h.engine();
    h.indicators.signal_entry();
    h.exchange.push_buy(Ok(BuyPlacement {
        order_id: OrderId::from("buy-fast"),
        quantity: dec!(0.04),
        filled: true,
    }));

    let command = engine.tick(t0()).expect("buy");
    run(&h, &mut engine, command, t0()).await;

    assert_eq!(engine.position().phase(), Phase::SettingUpSell);
    assert_eq!(engine.position().amount_to_sell(), dec!(0.04));
    assert!(h.orders.order(&h.pair, Side::Buy).is_none());
    assert!(h
        .orders
        .get(&h.pair, &OrderId::from("buy-fast"))
        .unwrap()
        .is_filled());

    let sell = engine.tick(at(1)).expect("sell");
    assert_eq!(
        sell.action,
        Action::PlaceSell {
            price: dec!(0.0505),
            amount: dec!(0.04),
        }
    );
}

#[tokio::test]
async fn buy_filled_by_feed_moves_to_sell_setup() {
    let h = Harness::new();
    let mut engine = awaiting_buy(&h).await;

    h.orders.record_fill(&h.pair, &OrderId::from("buy-1"), Decimal::ONE);
    let command = engine.tick(at(1)).expect("sell placed in the same tick");

    assert!(matches!(command.action, Action::PlaceSell { .. }));
    assert_eq!(engine.position().phase(), Phase::SettingUpSell);
    assert_eq!(engine.position().amount_to_sell(), dec!(0.04));
    assert!(h.orders.order(&h.pair, Side::Buy).is_none());
}

#[tokio::test]
async fn young_buy_order_is_left_alone() {
    let h = Harness::new();
    let mut engine = awaiting_buy(&h).await;

    assert!(engine.tick(at(180)).is_none());
    assert_eq!(engine.position().phase(), Phase::AwaitingBuy);
}

// Scenario B
#[tokio::test]
async fn timed_out_partial_buy_is_cancelled_and_sold() {
    let h = harness_with_buy_amount(dec!(0.01));
    let mut engine = awaiting_buy(&h).await;
    h.orders.record_fill(&h.pair, &OrderId::from("buy-1"), dec!(0.4));

    let command = engine.tick(at(181)).expect("cancel");
    assert!(matches!(command.action, Action::CancelBuy { .. }));
    run(&h, &mut engine, command, at(181)).await;

    assert_eq!(engine.position().phase(), Phase::SettingUpSell);
    assert_eq!(engine.position().amount_to_sell(), dec!(0.08));
    assert!(h
        .orders
        .get(&h.pair, &OrderId::from("buy-1"))
        .unwrap()
        .canceled);
    assert_eq!(
        h.notifier.count(|e| matches!(e, Event::BuyCanceled { .. })),
        1
    );
}

// Scenario C
#[tokio::test]
async fn unsellable_partial_fill_warns_once_per_condition() {
    let h = Harness::new();
    let mut engine = awaiting_buy(&h).await;
    h.orders.record_fill(&h.pair, &OrderId::from("buy-1"), dec!(0.4));
    let warnings = |h: &Harness| h.notifier.count(|e| matches!(e, Event::Warning { .. }));

    assert!(engine.tick(at(181)).is_none());
    assert!(engine.tick(at(182)).is_none());
    assert!(engine.tick(at(300)).is_none());
    assert_eq!(warnings(&h), 1);
    assert_eq!(h.exchange.cancel_count(), 0);

    h.orders.record_fill(&h.pair, &OrderId::from("buy-1"), dec!(0.45));
    assert!(engine.tick(at(301)).is_none());
    assert_eq!(warnings(&h), 2);
    assert_eq!(engine.position().phase(), Phase::AwaitingBuy);
}

#[tokio::test]
async fn unfilled_buy_cancel_allows_immediate_reentry() {
    let h = Harness::new();
    let mut engine = awaiting_buy(&h).await;

    let command = engine.tick(at(181)).expect("cancel");
    run(&h, &mut engine, command, at(181)).await;
    assert_eq!(engine.position().phase(), Phase::Validating);

    h.indicators.signal_entry();
    assert!(engine.tick(at(182)).is_some());
}

#[tokio::test]
async fn danger_zone_cancels_young_buy() {
    let h = harness_with_buy_amount(dec!(0.01));
    let mut engine = awaiting_buy(&h).await;
    h.ctx.signals.set_danger_zone(true);

    let command = engine.tick(at(5)).expect("cancel");
    assert!(matches!(command.action, Action::CancelBuy { .. }));
}

#[tokio::test]
async fn failed_buy_cancel_keeps_waiting() {
    let h = Harness::new();
    let mut engine = awaiting_buy(&h).await;
    h.exchange.push_cancel(Err(dipcatch::error::ExecutionError::Transport(
        "timeout".into(),
    )));

    let command = engine.tick(at(181)).expect("cancel");
    run(&h, &mut engine, command, at(181)).await;
    assert_eq!(engine.position().phase(), Phase::AwaitingBuy);
    assert!(h.orders.order(&h.pair, Side::Buy).is_some());
}

#[tokio::test]
async fn vanished_buy_order_returns_to_validating() {
    let h = Harness::new();
    let mut engine = awaiting_buy(&h).await;
    h.orders.mark_canceled(&h.pair, &OrderId::from("buy-1"));

    assert!(engine.tick(at(1)).is_none());
    assert_eq!(engine.position().phase(), Phase::Validating);
}

// Scenario D
#[tokio::test]
async fn price_drift_recreates_sell() {
    let h = Harness::new();
    let mut engine = managing_sell(&h, dec!(100.00000000), dec!(1));

    let command = engine.tick(t0()).expect("recreate");
    assert_eq!(
        command.action,
        Action::RecreateSell {
            replace: Some(OrderId::from("sell-0")),
            price: dec!(101.00000000),
            amount: dec!(1),
        }
    );
    // The replacement is rejected; the cancelled order is closed anyway and
    // the next tick starts over from sell setup.
    h.exchange.push_sell(Err(dipcatch::error::ExecutionError::Transport(
        "down".into(),
    )));
    run(&h, &mut engine, command, t0()).await;
    assert!(h.orders.order(&h.pair, Side::Sell).is_none());

    assert!(engine.tick(at(1)).is_none());
    assert_eq!(engine.position().phase(), Phase::SettingUpSell);
}

#[tokio::test]
async fn drift_recreation_waits_five_seconds() {
    let h = Harness::new();
    let seeded = managing_sell(&h, dec!(100), dec!(1));
    let mut position = seeded.position().clone();
    position.sell_retry.mark(t0());
    let mut engine = dipcatch::application::PairEngine::with_position(position, h.ctx.clone());

    assert!(engine.tick(at(3)).is_none());
    assert!(engine.tick(at(4)).is_none());
    assert!(engine.tick(at(5)).is_some());
}

#[tokio::test]
async fn amount_drift_recreates_sell() {
    let h = Harness::new();
    let mut engine = managing_sell(&h, dec!(101), dec!(0.5));

    let command = engine.tick(t0()).expect("recreate");
    assert!(matches!(
        command.action,
        Action::RecreateSell { amount, .. } if amount == dec!(1)
    ));
}

#[tokio::test]
async fn matching_sell_order_is_left_alone() {
    let h = Harness::new();
    let mut engine = managing_sell(&h, dec!(101), dec!(1));
    assert!(engine.tick(t0()).is_none());
    assert_eq!(engine.position().phase(), Phase::ManagingSell);
}

// Scenario F
#[tokio::test]
async fn force_sell_recreates_regardless_of_match() {
    let h = Harness::new();
    let mut engine = managing_sell(&h, dec!(101), dec!(1));
    engine.request_force_sell();

    let command = engine.tick(t0()).expect("recreate");
    assert!(!engine.position().force_sell);
    run(&h, &mut engine, command, t0()).await;

    assert_eq!(
        h.exchange.calls(),
        vec![
            ExchangeCall::Cancel {
                order_id: OrderId::from("sell-0"),
            },
            ExchangeCall::Sell {
                price: dec!(101),
                amount: dec!(1),
            },
        ]
    );
    let open = h.orders.order(&h.pair, Side::Sell).expect("new sell");
    assert_eq!(open.id, OrderId::from("sell-1"));
    assert!(h
        .orders
        .get(&h.pair, &OrderId::from("sell-0"))
        .unwrap()
        .canceled);
}

#[tokio::test]
async fn stop_loss_lowers_target_and_recreates() {
    let h = Harness::new();
    let mut engine = managing_sell(&h, dec!(101), dec!(1));
    h.market.set_last_close(&h.pair, 95.0);

    let command = engine.tick(t0()).expect("recreate at stop");
    assert!(matches!(
        command.action,
        Action::RecreateSell { price, .. } if price == dec!(95)
    ));
    assert_eq!(engine.position().sell_target, dec!(95));
    assert_eq!(
        h.notifier
            .count(|e| matches!(e, Event::StopLossActivated { .. })),
        1
    );
    run(&h, &mut engine, command, t0()).await;

    // Already lowered: the stop does not fire twice.
    h.market.set_last_close(&h.pair, 90.0);
    assert!(engine.tick(at(1)).is_none());
}

#[tokio::test]
async fn partial_sell_fills_reduce_amount_to_sell() {
    let h = Harness::new();
    let mut engine = managing_sell(&h, dec!(101), dec!(1));

    h.orders
        .record_fill(&h.pair, &OrderId::from("sell-0"), dec!(0.25));
    assert!(engine.tick(t0()).is_none());
    assert_eq!(engine.position().amount_to_sell(), dec!(0.75));

    assert!(engine.tick(at(1)).is_none());
    assert_eq!(engine.position().amount_to_sell(), dec!(0.75));
}

#[tokio::test]
async fn lost_sell_order_is_placed_again() {
    let h = Harness::new();
    let mut engine = managing_sell(&h, dec!(101), dec!(1));
    h.orders.mark_canceled(&h.pair, &OrderId::from("sell-0"));

    assert!(engine.tick(t0()).is_none());
    assert_eq!(engine.position().phase(), Phase::SettingUpSell);
    let command = engine.tick(at(1)).expect("sell again");
    assert!(matches!(command.action, Action::PlaceSell { .. }));
}

#[tokio::test]
async fn full_trade_cycle_resets_for_the_next_one() {
    let h = Harness::new();
    let mut engine = awaiting_buy(&h).await;

    h.orders.record_fill(&h.pair, &OrderId::from("buy-1"), Decimal::ONE);
    let sell = engine.tick(at(10)).expect("sell");
    run(&h, &mut engine, sell, at(10)).await;
    assert_eq!(engine.position().phase(), Phase::ManagingSell);
    assert!(engine.position().stop_loss.is_some());

    let mut previous = engine.position().amount_to_sell();
    for (i, fill) in [dec!(0.5), dec!(1)].into_iter().enumerate() {
        h.orders.record_fill(&h.pair, &OrderId::from("sell-2"), fill);
        engine.tick(at(20 + i as i64));
        assert!(engine.position().amount_to_sell() <= previous);
        previous = engine.position().amount_to_sell();
    }

    assert_eq!(engine.position().phase(), Phase::Validating);
    assert_eq!(engine.position().amount_to_sell(), Decimal::ZERO);
    assert_eq!(
        h.notifier
            .count(|e| matches!(e, Event::TradeFinished { .. })),
        1
    );
    assert!(h.orders.order(&h.pair, Side::Sell).is_none());
}

#[tokio::test]
async fn placed_sell_arms_stop_loss_below_entry() {
    let h = Harness::new();
    let mut engine = holding_after_instant_buy(&h).await;

    let sell = engine.tick(at(1)).expect("sell");
    assert!(run(&h, &mut engine, sell, at(1)).await.is_none());

    assert_eq!(engine.position().phase(), Phase::ManagingSell);
    assert_eq!(engine.position().entry_price, dec!(0.05));
    // Stop at entry * (1 - 0.9 * 0.05), sell at entry * (1 - 0.05).
    assert_eq!(
        engine.position().stop_loss,
        Some(StopLoss {
            stop_price: dec!(0.04775),
            sell_price: dec!(0.0475),
        })
    );
}

#[tokio::test]
async fn sell_filled_on_placement_finishes_the_trade() {
    let h = Harness::new();
    let mut engine = holding_after_instant_buy(&h).await;
    h.exchange.push_sell(Ok(SellPlacement {
        order_id: OrderId::from("sell-fast"),
        filled: true,
    }));

    let sell = engine.tick(at(1)).expect("sell");
    run(&h, &mut engine, sell, at(1)).await;

    assert_eq!(engine.position().phase(), Phase::Finished);
    assert_eq!(engine.position().amount_to_sell(), Decimal::ZERO);
    assert!(engine.position().stop_loss.is_none());
    assert!(h
        .orders
        .get(&h.pair, &OrderId::from("sell-fast"))
        .unwrap()
        .is_filled());
    assert!(h.orders.order(&h.pair, Side::Sell).is_none());

    assert!(engine.tick(at(2)).is_none());
    assert_eq!(engine.position().phase(), Phase::Validating);
    assert_eq!(
        h.notifier
            .count(|e| matches!(e, Event::TradeFinished { .. })),
        1
    );
}

#[tokio::test]
async fn recreated_sell_filled_on_placement_finishes_the_trade() {
    let h = Harness::new();
    let mut engine = managing_sell(&h, dec!(101), dec!(1));
    engine.request_force_sell();
    h.exchange.push_sell(Ok(SellPlacement {
        order_id: OrderId::from("sell-fast"),
        filled: true,
    }));

    let command = engine.tick(t0()).expect("recreate");
    assert!(run(&h, &mut engine, command, t0()).await.is_none());

    assert_eq!(engine.position().phase(), Phase::Finished);
    assert_eq!(engine.position().amount_to_sell(), Decimal::ZERO);
    assert!(h
        .orders
        .get(&h.pair, &OrderId::from("sell-0"))
        .unwrap()
        .canceled);
    assert!(h
        .orders
        .get(&h.pair, &OrderId::from("sell-fast"))
        .unwrap()
        .is_filled());

    engine.tick(at(1));
    assert_eq!(engine.position().phase(), Phase::Validating);
    assert_eq!(
        h.notifier
            .count(|e| matches!(e, Event::TradeFinished { .. })),
        1
    );
}

#[tokio::test]
async fn nothing_left_to_sell_finishes_without_an_order() {
    let h = Harness::new();
    let mut position = Position::new(h.pair.clone());
    position.open(dec!(100), dec!(0.01));
    position.hold(Decimal::ZERO);
    position.begin_sell_setup();
    let mut engine = dipcatch::application::PairEngine::with_position(position, h.ctx.clone());

    assert!(engine.tick(t0()).is_none());
    assert_eq!(engine.position().phase(), Phase::Finished);
    assert!(!engine.position().is_processing());

    assert!(engine.tick(at(1)).is_none());
    assert_eq!(engine.position().phase(), Phase::Validating);
    assert_eq!(h.exchange.sell_count(), 0);
}

#[tokio::test]
async fn sell_recreated_after_fill_is_withdrawn() {
    let h = Harness::new();
    let mut engine = managing_sell(&h, dec!(101), dec!(1));
    engine.request_force_sell();
    let command = engine.tick(t0()).expect("recreate");

    // The old order fills while the recreation is in flight.
    h.orders.record_fill(&h.pair, &OrderId::from("sell-0"), Decimal::ONE);
    assert!(engine.tick(at(1)).is_none());
    assert_eq!(engine.position().phase(), Phase::Finished);

    let follow_up = run(&h, &mut engine, command, at(1))
        .await
        .expect("withdraw the new order");
    assert_eq!(
        follow_up.action,
        Action::CancelSell {
            order_id: OrderId::from("sell-1"),
        }
    );
    assert_eq!(h.orders.open_count(&h.pair, Side::Sell), 0);
    assert!(engine.position().is_processing());

    assert!(run(&h, &mut engine, follow_up, at(1)).await.is_none());
    assert_eq!(
        h.exchange.calls().last(),
        Some(&ExchangeCall::Cancel {
            order_id: OrderId::from("sell-1"),
        })
    );

    assert!(engine.tick(at(2)).is_none());
    assert_eq!(engine.position().phase(), Phase::Validating);
    assert!(h.orders.order(&h.pair, Side::Sell).is_none());

    // A late fill on the withdrawn order does not finish the trade again.
    h.orders.record_fill(&h.pair, &OrderId::from("sell-1"), Decimal::ONE);
    engine.tick(at(3));
    assert_eq!(engine.position().phase(), Phase::Validating);
    assert_eq!(
        h.notifier
            .count(|e| matches!(e, Event::TradeFinished { .. })),
        1
    );
}
