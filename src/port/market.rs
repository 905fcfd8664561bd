//! Market-data port.
//!
//! Candle aggregation and polling live outside the state machine; this trait
//! is the read side plus the subscription switches the gate toggles.

use crate::domain::{Bar, PairId, Timeframe};

/// Per-pair chart access and update subscriptions.
pub trait MarketData: Send + Sync {
    /// Bars for `timeframe`, oldest first.
    fn chart(&self, pair: &PairId, timeframe: Timeframe) -> Vec<Bar>;

    /// True when any of `timeframes` is older than `max_age_secs`.
    ///
    /// With `strict` set, a chart that has never been loaded counts as stale.
    fn charts_need_update(
        &self,
        pair: &PairId,
        timeframes: &[Timeframe],
        max_age_secs: u64,
        strict: bool,
    ) -> bool;

    /// True when high-frequency updates are flowing for all `timeframes`.
    fn chart_updates_active(&self, pair: &PairId, timeframes: &[Timeframe]) -> bool;

    /// Request updates for `timeframes`; idempotent.
    fn ensure_chart_updates(&self, pair: &PairId, timeframes: &[Timeframe]);

    /// Register interest in high-frequency updates.
    fn add_watcher_chart_updates(&self, pair: &PairId, timeframes: &[Timeframe]);

    /// Drop interest registered by [`add_watcher_chart_updates`](Self::add_watcher_chart_updates).
    fn remove_watcher_chart_updates(&self, pair: &PairId, timeframes: &[Timeframe]);
}
