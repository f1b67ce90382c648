//! Ichimoku cloud.
//!
//! - Conversion line: (9-bar high + 9-bar low) / 2
//! - Base line: (26-bar high + 26-bar low) / 2
//! - Leading span A: (conversion + base) / 2, shifted 26 bars forward
//! - Leading span B: (52-bar high + 52-bar low) / 2, shifted 26 bars forward
//!
//! Because the spans are shifted forward, the value stored at bar `i`
//! was computed from the window ending at bar `i - displacement`.

use serde::{Deserialize, Serialize};

use super::{rolling_midpoint, shift_forward};
use crate::types::PriceSeries;

/// Window lengths for the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudParams {
    pub conversion: usize,
    pub base: usize,
    pub span_b: usize,
    pub displacement: usize,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            conversion: 9,
            base: 26,
            span_b: 52,
            displacement: 26,
        }
    }
}

/// Per-bar cloud lines. `None` where the defining window reaches past
/// the start of the series.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudState {
    pub conversion: Vec<Option<f64>>,
    pub base: Vec<Option<f64>>,
    pub leading_a: Vec<Option<f64>>,
    pub leading_b: Vec<Option<f64>>,
}

impl CloudState {
    pub fn compute(series: &PriceSeries, params: &CloudParams) -> Self {
        let high = series.highs();
        let low = series.lows();

        let conversion = rolling_midpoint(&high, &low, params.conversion);
        let base = rolling_midpoint(&high, &low, params.base);

        let mid_a: Vec<Option<f64>> = conversion
            .iter()
            .zip(&base)
            .map(|(c, b)| match (c, b) {
                (Some(c), Some(b)) => Some((c + b) / 2.0),
                _ => None,
            })
            .collect();
        let leading_a = shift_forward(&mid_a, params.displacement);

        let mid_b = rolling_midpoint(&high, &low, params.span_b);
        let leading_b = shift_forward(&mid_b, params.displacement);

        Self {
            conversion,
            base,
            leading_a,
            leading_b,
        }
    }

    pub fn len(&self) -> usize {
        self.leading_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leading_a.is_empty()
    }

    /// Leading spans A and B at the latest bar, if both are defined.
    pub fn latest_spans(&self) -> Option<(f64, f64)> {
        let a = self.leading_a.last().copied().flatten()?;
        let b = self.leading_b.last().copied().flatten()?;
        Some((a, b))
    }

    /// Upper edge of the cloud at the latest bar.
    pub fn latest_top(&self) -> Option<f64> {
        self.latest_spans().map(|(a, b)| a.max(b))
    }
}
