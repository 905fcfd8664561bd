//! Indicator library port. All functions are pure over bar slices.

use crate::domain::Bar;

pub trait Indicators: Send + Sync {
    /// Stochastic oscillator series (0..=100).
    fn stochastic(&self, bars: &[Bar], period: usize, smoothing: usize) -> Vec<f64>;

    /// Relative strength series scaled to `scale`, most recent first,
    /// `count` values long.
    fn rsi(&self, bars: &[Bar], period: usize, scale: f64, count: usize) -> Vec<f64>;

    /// Largest relative swing over the last `lookback` bars.
    fn max_diff(&self, bars: &[Bar], lookback: usize) -> f64;

    /// Traded volume proxy over the last `lookback` bars.
    fn volume_24h(&self, bars: &[Bar], lookback: usize) -> f64;

    /// Arithmetic mean; `0.0` for an empty series.
    fn average(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }
}
