//! A fully wired [`StrategyContext`] over the fakes in this module.

use std::sync::Arc;

use crate::adapter::{MemoryOrderStore, StandardHooks};
use crate::application::{Collaborators, PairEngine, StrategyContext};
use crate::config::{StrategyConfig, TimingConfig};
use crate::domain::PairId;
use crate::port::NotifierRegistry;

use super::{FakeMarket, RecordingNotifier, ScriptedExchange, ScriptedIndicators};

/// Price every chart closes at unless a test moves it.
pub const START_CLOSE: f64 = 0.05;

pub struct Harness {
    pub pair: PairId,
    pub market: Arc<FakeMarket>,
    pub indicators: Arc<ScriptedIndicators>,
    pub exchange: Arc<ScriptedExchange>,
    pub orders: Arc<MemoryOrderStore>,
    pub notifier: RecordingNotifier,
    pub ctx: Arc<StrategyContext>,
}

impl Harness {
    /// One pair with full history, an eligible gate and no entry signal,
    /// under default settings.
    pub fn new() -> Self {
        Self::with_config(&StrategyConfig::default(), &TimingConfig::default())
    }

    pub fn with_config(strategy: &StrategyConfig, timing: &TimingConfig) -> Self {
        let pair = PairId::from("ETHBTC");
        let market = Arc::new(FakeMarket::new().with_history(&pair, START_CLOSE));
        let indicators = Arc::new(ScriptedIndicators::eligible());
        let exchange = Arc::new(ScriptedExchange::new());
        let orders = Arc::new(MemoryOrderStore::new());
        let notifier = RecordingNotifier::new();

        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(notifier.clone()));
        let notifiers = Arc::new(registry);

        let collaborators = Collaborators {
            market: market.clone(),
            indicators: indicators.clone(),
            exchange: exchange.clone(),
            orders: orders.clone(),
            notifiers: notifiers.clone(),
            hooks: Arc::new(StandardHooks::new(notifiers)),
        };
        let ctx = Arc::new(StrategyContext::from_config(collaborators, strategy, timing));

        Self {
            pair,
            market,
            indicators,
            exchange,
            orders,
            notifier,
            ctx,
        }
    }

    pub fn engine(&self) -> PairEngine {
        PairEngine::new(self.pair.clone(), Arc::clone(&self.ctx))
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
