//! MACD momentum oscillator.
//!
//! oscillator = EMA(close, fast) − EMA(close, slow)
//! signal     = EMA(oscillator, signal)
//!
//! All three averages are seeded by the first observation (pandas
//! `adjust=False`), so every bar carries a value as soon as the series
//! is non-empty.

use serde::{Deserialize, Serialize};

use super::ema::ema_series;
use crate::types::PriceSeries;

/// Spans for the MACD averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Per-bar oscillator and signal line.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumState {
    pub oscillator: Vec<f64>,
    pub signal: Vec<f64>,
}

impl MomentumState {
    pub fn compute(series: &PriceSeries, params: &MacdParams) -> Self {
        let closes = series.closes();
        let fast = ema_series(&closes, params.fast);
        let slow = ema_series(&closes, params.slow);
        let oscillator: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_series(&oscillator, params.signal);
        Self { oscillator, signal }
    }

    pub fn len(&self) -> usize {
        self.oscillator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oscillator.is_empty()
    }

    /// Oscillator and signal at the latest bar.
    pub fn latest(&self) -> Option<(f64, f64)> {
        let osc = *self.oscillator.last()?;
        let sig = *self.signal.last()?;
        if osc.is_finite() && sig.is_finite() {
            Some((osc, sig))
        } else {
            None
        }
    }

    /// True when the oscillator crosses above the signal line on the
    /// transition from bar `i - 1` to bar `i`.
    pub fn crossed_up_at(&self, i: usize) -> bool {
        if i == 0 || i >= self.len() || i >= self.signal.len() {
            return false;
        }
        self.oscillator[i - 1] <= self.signal[i - 1] && self.oscillator[i] > self.signal[i]
    }

    /// Bullish crossover on the most recent bar.
    pub fn bullish_cross(&self) -> bool {
        match self.len() {
            0 | 1 => false,
            n => self.crossed_up_at(n - 1),
        }
    }
}
