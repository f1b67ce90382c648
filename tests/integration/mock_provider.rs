//! Mock market-data provider for integration testing.
//!
//! Provides a deterministic `MarketDataProvider` that serves scripted
//! series per ticker and interval, records every request, and can be
//! told to fail or panic for chosen tickers. All in-memory with no
//! network access.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use screener::data::MarketDataProvider;
use screener::types::{Interval, Period, PriceBar, PriceSeries};

/// What the provider does for one ticker.
#[derive(Clone)]
pub enum Script {
    /// Same series for every interval.
    All(PriceSeries),
    /// Series per interval; unlisted intervals come back empty.
    PerInterval(HashMap<Interval, PriceSeries>),
    Error(String),
    Panic,
}

/// A scripted provider. Tickers without a script get an empty series.
#[derive(Default)]
pub struct MockProvider {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<(String, Interval)>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ticker: &str, script: Script) -> Self {
        self.scripts.insert(ticker.to_string(), script);
        self
    }

    /// Scripts `ticker` to pass every check.
    pub fn bullish(self, ticker: &str) -> Self {
        let mut per = HashMap::new();
        per.insert(Interval::Daily, bullish_daily());
        per.insert(Interval::Minute60, uptrend(300));
        per.insert(Interval::Minute1, uptrend(500));
        self.with(ticker, Script::PerInterval(per))
    }

    /// Every request made so far, in arrival order.
    pub fn calls(&self) -> Vec<(String, Interval)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, ticker: &str) -> Vec<Interval> {
        self.calls()
            .into_iter()
            .filter(|(t, _)| t == ticker)
            .map(|(_, i)| i)
            .collect()
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn fetch_series(
        &self,
        ticker: &str,
        _period: Period,
        interval: Interval,
    ) -> Result<PriceSeries> {
        self.calls.lock().unwrap().push((ticker.to_string(), interval));

        match self.scripts.get(ticker) {
            None => Ok(PriceSeries::empty()),
            Some(Script::All(series)) => Ok(series.clone()),
            Some(Script::PerInterval(per)) => {
                Ok(per.get(&interval).cloned().unwrap_or_else(PriceSeries::empty))
            }
            Some(Script::Error(msg)) => Err(anyhow!("{msg}")),
            Some(Script::Panic) => panic!("scripted panic for {ticker}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Series builders
// ---------------------------------------------------------------------------

/// Bars at one-day spacing; high and low sit half a point either side of
/// the close.
pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let start = DateTime::<Utc>::from_timestamp(1_600_000_000, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            timestamp: start + Duration::days(i as i64),
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: 1_000,
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

/// Long uptrend, a six-bar pullback, then one sharp up bar: above the
/// cloud with a MACD bullish cross on the last bar.
pub fn bullish_daily() -> PriceSeries {
    let mut closes: Vec<f64> = (0..150).map(|i| 100.0 + i as f64).collect();
    let peak = *closes.last().unwrap();
    closes.extend((1..=6).map(|i| peak - 2.0 * i as f64));
    let trough = *closes.last().unwrap();
    closes.push(trough + 40.0);
    series_from_closes(&closes)
}

/// Above the cloud, no fresh cross.
pub fn uptrend(n: usize) -> PriceSeries {
    let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
    series_from_closes(&closes)
}

/// Below the cloud.
pub fn downtrend(n: usize) -> PriceSeries {
    let closes: Vec<f64> = (0..n).map(|i| 500.0 - i as f64).collect();
    series_from_closes(&closes)
}
