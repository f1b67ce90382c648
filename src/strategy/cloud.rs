//! Cloud-position evaluation.
//!
//! Decides whether the latest close sits above the Ichimoku cloud of a
//! series. Short series and undefined spans count as "not above".

use crate::indicators::{CloudParams, CloudState};
use crate::types::PriceSeries;

/// Where the latest close sits relative to the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudPosition {
    Above,
    NotAbove,
    /// Fewer bars than the evaluator's minimum.
    InsufficientHistory,
    /// A leading span at the latest bar has no source data.
    Undefined,
}

#[derive(Debug, Clone)]
pub struct CloudEvaluator {
    params: CloudParams,
    min_bars: usize,
}

impl CloudEvaluator {
    pub fn new(params: CloudParams, min_bars: usize) -> Self {
        Self { params, min_bars }
    }

    pub fn position(&self, series: &PriceSeries) -> CloudPosition {
        if series.len() < self.min_bars {
            return CloudPosition::InsufficientHistory;
        }
        let cloud = CloudState::compute(series, &self.params);
        let (Some(top), Some(last)) = (cloud.latest_top(), series.last()) else {
            return CloudPosition::Undefined;
        };
        if last.close > top {
            CloudPosition::Above
        } else {
            CloudPosition::NotAbove
        }
    }

    pub fn is_above_cloud(&self, series: &PriceSeries) -> bool {
        self.position(series) == CloudPosition::Above
    }
}

impl Default for CloudEvaluator {
    fn default() -> Self {
        Self::new(CloudParams::default(), 100)
    }
}
