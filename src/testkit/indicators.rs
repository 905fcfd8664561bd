//! [`Indicators`] returning scripted readings.
//!
//! Readings are keyed by chart length (see [`SLOW_BARS`] and friends) and,
//! for the stochastic, by smoothing: the gate and the entry evaluator use
//! different smoothing on the same chart.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::Bar;
use crate::port::Indicators;

use super::market::{FAST_BARS, MEDIUM_BARS, SLOW_BARS};

const GATE_SLOW_SMOOTHING: usize = 11;
const GATE_FAST_SMOOTHING: usize = 24;
const ENTRY_SMOOTHING: usize = 3;
const NEUTRAL: f64 = 50.0;

#[derive(Default)]
struct Script {
    stochastic: HashMap<(usize, usize), f64>,
    rsi: HashMap<usize, f64>,
    max_diff: f64,
    volume: f64,
}

pub struct ScriptedIndicators {
    script: Mutex<Script>,
}

impl ScriptedIndicators {
    /// Gate passes; no entry signal.
    pub fn eligible() -> Self {
        let indicators = Self {
            script: Mutex::new(Script::default()),
        };
        indicators.set_gate(150.0, 40.0, 25.0, 50.0);
        indicators.clear_entry();
        indicators
    }

    /// Script gate readings: 24h volume, 1h and 5m stochastic averages,
    /// 5m max-diff.
    pub fn set_gate(&self, volume: f64, slow: f64, fast: f64, max_diff: f64) {
        let mut script = self.script.lock().unwrap();
        script.volume = volume;
        script.max_diff = max_diff;
        script.stochastic.insert((SLOW_BARS, GATE_SLOW_SMOOTHING), slow);
        script.stochastic.insert((FAST_BARS, GATE_FAST_SMOOTHING), fast);
    }

    /// Make the gate reject the pair.
    pub fn set_ineligible(&self) {
        self.script.lock().unwrap().volume = 0.0;
    }

    /// Script entry readings: 5m RSI and 1h/15m/5m stochastic averages.
    pub fn set_entry(&self, rsi: f64, slow: f64, medium: f64, fast: f64) {
        let mut script = self.script.lock().unwrap();
        script.rsi.insert(FAST_BARS, rsi);
        script.stochastic.insert((SLOW_BARS, ENTRY_SMOOTHING), slow);
        script.stochastic.insert((MEDIUM_BARS, ENTRY_SMOOTHING), medium);
        script.stochastic.insert((FAST_BARS, ENTRY_SMOOTHING), fast);
    }

    /// Readings that satisfy the deep-dip entry setup.
    pub fn signal_entry(&self) {
        self.set_entry(20.0, 40.0, 10.0, 10.0);
    }

    pub fn clear_entry(&self) {
        self.set_entry(NEUTRAL, NEUTRAL, NEUTRAL, NEUTRAL);
    }
}

impl Indicators for ScriptedIndicators {
    fn stochastic(&self, bars: &[Bar], _period: usize, smoothing: usize) -> Vec<f64> {
        let script = self.script.lock().unwrap();
        vec![*script
            .stochastic
            .get(&(bars.len(), smoothing))
            .unwrap_or(&NEUTRAL)]
    }

    fn rsi(&self, bars: &[Bar], _period: usize, _scale: f64, count: usize) -> Vec<f64> {
        let script = self.script.lock().unwrap();
        vec![*script.rsi.get(&bars.len()).unwrap_or(&NEUTRAL); count]
    }

    fn max_diff(&self, _bars: &[Bar], _lookback: usize) -> f64 {
        self.script.lock().unwrap().max_diff
    }

    fn volume_24h(&self, _bars: &[Bar], _lookback: usize) -> f64 {
        self.script.lock().unwrap().volume
    }
}
