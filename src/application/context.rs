//! Collaborators and settings shared by the evaluators of one strategy.

use std::sync::Arc;

use crate::application::entry::EntryThresholds;
use crate::application::gate::GateThresholds;
use crate::application::policy::{TimingPolicy, TradeSettings};
use crate::application::signals::MarketSignals;
use crate::config::{StrategyConfig, TimingConfig};
use crate::port::{Exchange, Indicators, MarketData, NotifierRegistry, OrderStore, TradeHooks};

/// Everything a [`PairEngine`](crate::application::PairEngine) needs besides
/// its own position. Shared by all pairs of a strategy.
pub struct StrategyContext {
    pub market: Arc<dyn MarketData>,
    pub indicators: Arc<dyn Indicators>,
    pub exchange: Arc<dyn Exchange>,
    pub orders: Arc<dyn OrderStore>,
    pub notifiers: Arc<NotifierRegistry>,
    pub hooks: Arc<dyn TradeHooks>,
    pub signals: Arc<MarketSignals>,
    pub trade: TradeSettings,
    pub timing: TimingPolicy,
    pub gate: GateThresholds,
    pub entry: EntryThresholds,
}

/// The ports a [`StrategyContext`] is assembled from.
pub struct Collaborators {
    pub market: Arc<dyn MarketData>,
    pub indicators: Arc<dyn Indicators>,
    pub exchange: Arc<dyn Exchange>,
    pub orders: Arc<dyn OrderStore>,
    pub notifiers: Arc<NotifierRegistry>,
    pub hooks: Arc<dyn TradeHooks>,
}

impl StrategyContext {
    /// Assemble a context from ports and the `[strategy]`/`[timing]`
    /// configuration sections.
    #[must_use]
    pub fn from_config(
        collaborators: Collaborators,
        strategy: &StrategyConfig,
        timing: &TimingConfig,
    ) -> Self {
        let Collaborators {
            market,
            indicators,
            exchange,
            orders,
            notifiers,
            hooks,
        } = collaborators;
        Self {
            market,
            indicators,
            exchange,
            orders,
            notifiers,
            hooks,
            signals: Arc::new(MarketSignals::new(strategy.min_trade_amount)),
            trade: TradeSettings::from(strategy),
            timing: TimingPolicy::from(timing),
            gate: strategy.gate.clone(),
            entry: strategy.entry.clone(),
        }
    }
}
