//! Indicator engine.
//!
//! Pure functions over a [`PriceSeries`](crate::types::PriceSeries):
//! the Ichimoku cloud and the MACD momentum oscillator. No I/O, no
//! state shared between calls; every computation returns freshly
//! allocated per-bar output.

pub mod ema;
pub mod ichimoku;
pub mod macd;

pub use ichimoku::{CloudParams, CloudState};
pub use macd::{MacdParams, MomentumState};

/// Midpoint of the highest high and lowest low over a trailing window
/// ending at each bar. `None` until a full window is available.
pub(crate) fn rolling_midpoint(high: &[f64], low: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = high.len().min(low.len());
    let mut out = vec![None; n];
    if window == 0 || window > n {
        return out;
    }

    for i in (window - 1)..n {
        let start = i + 1 - window;
        let highest = high[start..=i].iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lowest = low[start..=i].iter().copied().fold(f64::INFINITY, f64::min);
        out[i] = Some((highest + lowest) / 2.0);
    }
    out
}

/// Shift a series forward by `periods` bars, filling the head with `None`.
pub(crate) fn shift_forward(values: &[Option<f64>], periods: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    for i in periods..n {
        out[i] = values[i - periods];
    }
    out
}
