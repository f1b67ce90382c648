//! Market-data providers.
//!
//! Defines the `MarketDataProvider` trait and the Yahoo Finance
//! implementation used in production.

pub mod yahoo;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{Interval, Period, PriceSeries};

/// Abstraction over an OHLC history source.
///
/// Implementors return the bars for one ticker covering `period` at the
/// given bar `interval`, oldest first. An empty series is a valid answer
/// (no data); callers treat it the same as a failed fetch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_series(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries>;
}
