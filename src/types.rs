//! Shared types for the screener.
//!
//! Price data, timeframes, per-ticker verdicts and the scan result form
//! the data model used across the indicator, strategy, engine and
//! dashboard modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Price data
// ---------------------------------------------------------------------------

/// A single OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// An immutable, chronologically ordered run of bars for one ticker at
/// one granularity.
///
/// Construction enforces strictly increasing timestamps and finite
/// prices. Indicators take `&PriceSeries` and allocate their own output,
/// so the same snapshot can be shared between the cloud and momentum
/// checks.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, ScreenerError> {
        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_finite() {
                return Err(ScreenerError::MalformedSeries(format!(
                    "non-finite price at bar {i}"
                )));
            }
            if i > 0 && bars[i - 1].timestamp >= bar.timestamp {
                return Err(ScreenerError::MalformedSeries(format!(
                    "timestamp at bar {i} ({}) does not follow {}",
                    bar.timestamp,
                    bars[i - 1].timestamp
                )));
            }
        }
        Ok(Self { bars })
    }

    pub fn empty() -> Self {
        Self { bars: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Build a series from `(high, low, close)` triples at one-day spacing.
    /// Open is set to the close and volume to zero.
    #[cfg(test)]
    pub fn from_hlc(rows: &[(f64, f64, f64)]) -> Self {
        let start = DateTime::<Utc>::from_timestamp(1_600_000_000, 0).unwrap_or_default();
        let bars = rows
            .iter()
            .enumerate()
            .map(|(i, &(high, low, close))| PriceBar {
                timestamp: start + chrono::Duration::days(i as i64),
                open: close,
                high,
                low,
                close,
                volume: 0,
            })
            .collect();
        Self::new(bars).unwrap()
    }

    /// Build a series from closes only; high and low hug the close.
    #[cfg(test)]
    pub fn from_closes(closes: &[f64]) -> Self {
        let rows: Vec<_> = closes.iter().map(|&c| (c + 0.5, c - 0.5, c)).collect();
        Self::from_hlc(&rows)
    }
}

// ---------------------------------------------------------------------------
// Timeframes
// ---------------------------------------------------------------------------

/// Bar granularity requested from the market-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    Minute1,
    Minute60,
    Daily,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute60 => "60m",
            Interval::Daily => "1d",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look-back span of a history request. `Display` gives Yahoo's range
/// notation (`7d`, `730d`, `3y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Days(u32),
    Years(u32),
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Days(d) => write!(f, "{d}d"),
            Period::Years(y) => write!(f, "{y}y"),
        }
    }
}

/// The three chart granularities the screen looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    Daily,
    Hourly,
    Minute,
}

impl Timeframe {
    pub fn period(&self) -> Period {
        match self {
            Timeframe::Daily => Period::Years(3),
            Timeframe::Hourly => Period::Days(730),
            Timeframe::Minute => Period::Days(7),
        }
    }

    pub fn interval(&self) -> Interval {
        match self {
            Timeframe::Daily => Interval::Daily,
            Timeframe::Hourly => Interval::Minute60,
            Timeframe::Minute => Interval::Minute1,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Daily => write!(f, "daily"),
            Timeframe::Hourly => write!(f, "hourly"),
            Timeframe::Minute => write!(f, "minute"),
        }
    }
}

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

/// Why a ticker did not qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// Fetch failed or came back empty.
    ProviderUnavailable(Timeframe),
    /// Fewer bars than the minimum required for a cloud read.
    InsufficientHistory(Timeframe),
    /// Latest momentum value could not be computed.
    IndicatorUndefined,
    /// Daily close is not above the daily cloud.
    BelowCloud(Timeframe),
    /// No bullish MACD crossover on the latest daily bar.
    NoMomentumCross,
    /// The scan deadline passed before the pipeline finished.
    TimedOut,
    /// The worker task running the pipeline did not complete.
    WorkerFailed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::ProviderUnavailable(tf) => write!(f, "no {tf} data"),
            Rejection::InsufficientHistory(tf) => write!(f, "insufficient {tf} history"),
            Rejection::IndicatorUndefined => write!(f, "momentum undefined"),
            Rejection::BelowCloud(tf) => write!(f, "not above {tf} cloud"),
            Rejection::NoMomentumCross => write!(f, "no momentum cross"),
            Rejection::TimedOut => write!(f, "timed out"),
            Rejection::WorkerFailed => write!(f, "worker failed"),
        }
    }
}

/// Terminal state of the per-ticker decision pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Qualifies,
    Rejected(Rejection),
}

impl Verdict {
    pub fn qualifies(&self) -> bool {
        matches!(self, Verdict::Qualifies)
    }
}

// ---------------------------------------------------------------------------
// Scan result
// ---------------------------------------------------------------------------

/// Outcome of one full scan over the ticker universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub timestamp: DateTime<Utc>,
    /// Qualifying tickers, sorted lexicographically.
    pub qualifying: Vec<String>,
    pub total_scanned: usize,
}

impl ScanResult {
    pub fn count(&self) -> usize {
        self.qualifying.len()
    }
}

impl fmt::Display for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scan @ {}: {}/{} qualifying [{}]",
            self.timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
            self.count(),
            self.total_scanned,
            self.qualifying.join(", "),
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the screener.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("Market data error ({ticker}): {message}")]
    MarketData { ticker: String, message: String },

    #[error("Malformed price series: {0}")]
    MalformedSeries(String),

    #[error("Universe error: {0}")]
    Universe(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
