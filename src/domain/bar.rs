//! Candle bars and chart timeframes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Chart aggregation period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
}

impl Timeframe {
    /// Venue notation for the timeframe.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::OneHour => "1h",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timeframes the validity gate reads.
pub const VALIDATION_TIMEFRAMES: [Timeframe; 2] = [Timeframe::OneHour, Timeframe::FiveMinutes];

/// Timeframes watched at high frequency while a pair is tradable.
pub const WATCH_TIMEFRAMES: [Timeframe; 3] = [
    Timeframe::OneHour,
    Timeframe::FifteenMinutes,
    Timeframe::FiveMinutes,
];

/// One OHLCV candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// A flat bar where every price equals `close`.
    #[must_use]
    pub const fn flat(close: f64, volume: f64) -> Self {
        Self {
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }
}

/// Close of the most recent bar, if any.
#[must_use]
pub fn last_close(bars: &[Bar]) -> Option<f64> {
    bars.last().map(|bar| bar.close)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_uses_venue_notation() {
        assert_eq!(Timeframe::OneHour.to_string(), "1h");
        assert_eq!(Timeframe::FifteenMinutes.as_str(), "15m");
    }

    #[test]
    fn last_close_of_empty_chart_is_none() {
        assert_eq!(last_close(&[]), None);
        assert_eq!(
            last_close(&[Bar::flat(1.0, 2.0), Bar::flat(3.0, 4.0)]),
            Some(3.0)
        );
    }
}
