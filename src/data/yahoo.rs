//! Yahoo Finance chart API.
//!
//! API: `https://query1.finance.yahoo.com/v8/finance/chart/{symbol}`
//! Auth: Not required.
//! Window: `range` in Yahoo's own notation (`3y`, `730d`, `7d`), resolved
//! against Yahoo's clock so a span at the intraday limit is never read as
//! starting past it. Intraday history is capped by Yahoo (60m ≈ 730
//! days, 1m ≈ 7 days), which matches the spans the screen asks for.
//! Rows with a null open/high/low/close are dropped.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::MarketDataProvider;
use crate::config::MarketDataConfig;
use crate::types::{Interval, Period, PriceBar, PriceSeries, ScreenerError};

// ---------------------------------------------------------------------------
// API response types (Yahoo JSON → Rust)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    /// Absent when the window holds no trading sessions.
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Yahoo Finance market-data client.
pub struct YahooClient {
    http: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(config: &MarketDataConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client for Yahoo Finance")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self, ticker: &str, period: Period, interval: Interval) -> String {
        format!(
            "{}/{}?range={}&interval={}&includePrePost=false",
            self.base_url,
            urlencoding::encode(ticker),
            period,
            interval.as_str(),
        )
    }
}

/// Turn a chart response body into a validated series.
///
/// Yahoo occasionally repeats the timestamp of the live (still forming)
/// bar; the later row wins.
fn parse_chart(ticker: &str, body: &str) -> Result<PriceSeries> {
    let response: ChartResponse =
        serde_json::from_str(body).context("Failed to parse Yahoo chart response")?;

    if let Some(err) = response.chart.error {
        return Err(ScreenerError::MarketData {
            ticker: ticker.to_string(),
            message: format!("{}: {}", err.code, err.description),
        }
        .into());
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty());
    };
    let quotes = data.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars: Vec<PriceBar> = Vec::with_capacity(data.timestamp.len());
    for (i, &ts) in data.timestamp.iter().enumerate() {
        let field = |col: &Vec<Option<f64>>| col.get(i).copied().flatten();
        let (Some(open), Some(high), Some(low), Some(close)) =
            (field(&quotes.open), field(&quotes.high), field(&quotes.low), field(&quotes.close))
        else {
            continue;
        };
        let Some(timestamp) = DateTime::<Utc>::from_timestamp(ts, 0) else {
            continue;
        };
        let bar = PriceBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume: quotes.volume.get(i).copied().flatten().unwrap_or(0),
        };

        match bars.last_mut() {
            Some(prev) if prev.timestamp == bar.timestamp => *prev = bar,
            _ => bars.push(bar),
        }
    }

    Ok(PriceSeries::new(bars)?)
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn fetch_series(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries> {
        let url = self.build_url(ticker, period, interval);
        debug!(ticker, %period, %interval, "Fetching Yahoo chart");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Yahoo chart request failed for {ticker}"))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() && !body.contains("\"chart\"") {
            anyhow::bail!("Yahoo chart error {status} for {ticker}");
        }

        let series = parse_chart(ticker, &body)?;
        debug!(ticker, %period, %interval, bars = series.len(), "Yahoo chart fetched");
        Ok(series)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
