//! Per-pair tick driver.
//!
//! A [`PairEngine`] owns one [`Position`] and advances it one step per
//! [`tick`](PairEngine::tick). Venue calls leave the engine as
//! [`Command`]s and come back as [`Completion`]s through
//! [`complete`](PairEngine::complete).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::application::command::{Command, Completion};
use crate::application::context::StrategyContext;
use crate::application::{entry, gate, reconcile, supervisor};
use crate::domain::{PairId, Phase, Position, WATCH_TIMEFRAMES};

pub struct PairEngine {
    position: Position,
    ctx: Arc<StrategyContext>,
}

impl PairEngine {
    #[must_use]
    pub fn new(pair: PairId, ctx: Arc<StrategyContext>) -> Self {
        Self {
            position: Position::new(pair),
            ctx,
        }
    }

    /// Resume from a previously captured position.
    #[must_use]
    pub fn with_position(position: Position, ctx: Arc<StrategyContext>) -> Self {
        Self { position, ctx }
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub fn pair(&self) -> &PairId {
        self.position.pair()
    }

    /// Ask for the held amount to be re-offered at the current target on the
    /// next tick in [`Phase::ManagingSell`].
    pub fn request_force_sell(&mut self) {
        self.position.force_sell = true;
    }

    /// Advance the state machine by one step.
    ///
    /// At most one command is issued per tick, and none while a previous
    /// command is still outstanding.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Command> {
        let ctx = Arc::clone(&self.ctx);
        let position = &mut self.position;

        if position.phase().is_gated() && !position.is_processing() {
            if let Some(valid) = gate::evaluate(&ctx, position, now).is_valid() {
                debug!(pair = %position.pair(), valid, "Gate evaluated");
            }
        }

        if position.phase() == Phase::Invalid {
            return None;
        }

        let pair = position.pair().clone();
        if !ctx.market.chart_updates_active(&pair, &WATCH_TIMEFRAMES) {
            debug!(pair = %pair, "Chart updates inactive, requesting");
            ctx.market.ensure_chart_updates(&pair, &WATCH_TIMEFRAMES);
            return None;
        }

        reconcile::reconcile(&ctx, position);

        if position.is_processing() {
            return None;
        }

        match position.phase() {
            Phase::Invalid => None,
            Phase::Validating => entry::evaluate(&ctx, position, now),
            Phase::AwaitingBuy => supervisor::supervise_buy(&ctx, position, now),
            Phase::SettingUpSell => supervisor::setup_sell(&ctx, position),
            Phase::ManagingSell => supervisor::manage_sell(&ctx, position, now),
            Phase::Finished => {
                ctx.hooks.trade_finished(position);
                None
            }
        }
    }

    /// Apply the result of a command this engine issued.
    ///
    /// Completions for any request other than the one in flight are dropped.
    /// May return a follow-up command, issued under a fresh request.
    pub fn complete(&mut self, completion: Completion, now: DateTime<Utc>) -> Option<Command> {
        let ctx = Arc::clone(&self.ctx);
        let position = &mut self.position;

        if !position.complete_request(completion.request()) {
            warn!(
                pair = %position.pair(),
                request = %completion.request(),
                "Ignoring completion for a request not in flight"
            );
            return None;
        }

        match completion {
            Completion::BuyPlaced { price, result, .. } => {
                entry::on_buy_placed(&ctx, position, price, result, now);
                None
            }
            Completion::BuyCanceled { order, result, .. } => {
                supervisor::on_buy_canceled(&ctx, position, order, result);
                None
            }
            Completion::SellPlaced {
                price,
                amount,
                result,
                ..
            } => {
                supervisor::on_sell_placed(&ctx, position, price, amount, result, now);
                None
            }
            Completion::SellRecreated {
                replaced,
                price,
                amount,
                result,
                ..
            } => {
                supervisor::on_sell_recreated(&ctx, position, replaced, price, amount, result, now)
            }
            Completion::SellCanceled {
                order_id, result, ..
            } => {
                supervisor::on_sell_canceled(position, &order_id, result);
                None
            }
        }
    }
}
