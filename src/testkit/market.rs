//! In-memory [`MarketData`] with switchable freshness and subscriptions.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::domain::{Bar, PairId, Timeframe};
use crate::port::MarketData;

/// 1h chart length used by [`FakeMarket::with_history`].
pub const SLOW_BARS: usize = 600;
/// 15m chart length used by [`FakeMarket::with_history`].
pub const MEDIUM_BARS: usize = 601;
/// 5m chart length used by [`FakeMarket::with_history`].
pub const FAST_BARS: usize = 602;

#[derive(Default)]
struct State {
    charts: HashMap<(PairId, Timeframe), Vec<Bar>>,
    stale: bool,
    updates_active: bool,
    watched: HashSet<PairId>,
    ensure_calls: usize,
    watcher_removals: usize,
}

/// Charts are plain vectors; staleness and update activity are flags.
///
/// Chart lengths differ per timeframe so that
/// [`ScriptedIndicators`](super::ScriptedIndicators) can tell the series
/// apart.
pub struct FakeMarket {
    state: Mutex<State>,
}

impl FakeMarket {
    /// Fresh charts, updates flowing, no history.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                updates_active: true,
                ..State::default()
            }),
        }
    }

    /// Load enough flat history on every timeframe for `pair`, closing at
    /// `close`.
    pub fn with_history(self, pair: &PairId, close: f64) -> Self {
        for (timeframe, len) in [
            (Timeframe::OneHour, SLOW_BARS),
            (Timeframe::FifteenMinutes, MEDIUM_BARS),
            (Timeframe::FiveMinutes, FAST_BARS),
        ] {
            self.set_chart(pair, timeframe, vec![Bar::flat(close, 10.0); len]);
        }
        self
    }

    pub fn set_chart(&self, pair: &PairId, timeframe: Timeframe, bars: Vec<Bar>) {
        self.lock().charts.insert((pair.clone(), timeframe), bars);
    }

    /// Move the last 5m close to `close`.
    pub fn set_last_close(&self, pair: &PairId, close: f64) {
        let mut state = self.lock();
        if let Some(last) = state
            .charts
            .get_mut(&(pair.clone(), Timeframe::FiveMinutes))
            .and_then(|bars| bars.last_mut())
        {
            last.close = close;
        }
    }

    pub fn set_stale(&self, stale: bool) {
        self.lock().stale = stale;
    }

    pub fn set_updates_active(&self, active: bool) {
        self.lock().updates_active = active;
    }

    /// True while a watcher is registered for `pair`.
    pub fn is_watched(&self, pair: &PairId) -> bool {
        self.lock().watched.contains(pair)
    }

    pub fn ensure_calls(&self) -> usize {
        self.lock().ensure_calls
    }

    pub fn watcher_removals(&self) -> usize {
        self.lock().watcher_removals
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

impl Default for FakeMarket {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketData for FakeMarket {
    fn chart(&self, pair: &PairId, timeframe: Timeframe) -> Vec<Bar> {
        self.lock()
            .charts
            .get(&(pair.clone(), timeframe))
            .cloned()
            .unwrap_or_default()
    }

    fn charts_need_update(
        &self,
        _pair: &PairId,
        _timeframes: &[Timeframe],
        _max_age_secs: u64,
        _strict: bool,
    ) -> bool {
        self.lock().stale
    }

    fn chart_updates_active(&self, _pair: &PairId, _timeframes: &[Timeframe]) -> bool {
        self.lock().updates_active
    }

    fn ensure_chart_updates(&self, _pair: &PairId, _timeframes: &[Timeframe]) {
        self.lock().ensure_calls += 1;
    }

    fn add_watcher_chart_updates(&self, pair: &PairId, _timeframes: &[Timeframe]) {
        self.lock().watched.insert(pair.clone());
    }

    fn remove_watcher_chart_updates(&self, pair: &PairId, _timeframes: &[Timeframe]) {
        let mut state = self.lock();
        state.watched.remove(pair);
        state.watcher_removals += 1;
    }
}
