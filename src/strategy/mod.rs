//! Per-ticker decision pipeline.
//!
//! Daily cloud + daily MACD cross gate the two intraday fetches; the
//! ticker qualifies only if the hourly and minute closes are also above
//! their clouds.

pub mod cloud;

use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::data::MarketDataProvider;
use crate::indicators::{CloudParams, MacdParams, MomentumState};
use crate::types::{PriceSeries, Rejection, ScreenerError, Timeframe, Verdict};
use cloud::{CloudEvaluator, CloudPosition};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Strategy parameters. Defaults are overridden by config.toml at runtime.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Minimum bars for any cloud read, on every timeframe.
    pub min_bars: usize,
    pub cloud: CloudParams,
    pub macd: MacdParams,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            min_bars: 100,
            cloud: CloudParams::default(),
            macd: MacdParams::default(),
        }
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), ScreenerError> {
        let c = &self.cloud;
        if c.conversion == 0 || c.base == 0 || c.span_b == 0 {
            return Err(ScreenerError::Config("cloud windows must be at least 1".into()));
        }
        let m = &self.macd;
        if m.fast == 0 || m.slow == 0 || m.signal == 0 {
            return Err(ScreenerError::Config("macd spans must be at least 1".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Runs the multi-timeframe screen for one ticker at a time.
///
/// Holds no per-ticker state, so one instance is shared by every worker
/// in a scan.
pub struct DecisionPipeline {
    provider: Arc<dyn MarketDataProvider>,
    evaluator: CloudEvaluator,
    config: StrategyConfig,
}

impl DecisionPipeline {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: StrategyConfig) -> Self {
        Self {
            provider,
            evaluator: CloudEvaluator::new(config.cloud, config.min_bars),
            config,
        }
    }

    /// Evaluate one ticker. Never fails: every provider error, missing
    /// bar or undefined indicator becomes a rejection.
    ///
    /// Steps:
    /// 1. Fetch daily bars; bail on error, empty or short history.
    /// 2. Daily cloud position and MACD on the same snapshot.
    /// 3. Require above-cloud AND a bullish cross on the latest bar.
    /// 4. Only then fetch hourly and minute bars (concurrently).
    /// 5. Qualify iff both intraday closes are above their clouds.
    pub async fn evaluate(&self, ticker: &str) -> Verdict {
        let verdict = match self.run(ticker).await {
            Ok(()) => Verdict::Qualifies,
            Err(rejection) => Verdict::Rejected(rejection),
        };
        debug!(ticker, ?verdict, "Pipeline finished");
        verdict
    }

    async fn run(&self, ticker: &str) -> Result<(), Rejection> {
        let daily = self.fetch(ticker, Timeframe::Daily).await?;
        if daily.len() < self.config.min_bars {
            return Err(Rejection::InsufficientHistory(Timeframe::Daily));
        }

        let above_daily = self.evaluator.is_above_cloud(&daily);

        let momentum = MomentumState::compute(&daily, &self.config.macd);
        if momentum.latest().is_none() {
            return Err(Rejection::IndicatorUndefined);
        }

        if !above_daily {
            return Err(Rejection::BelowCloud(Timeframe::Daily));
        }
        if !momentum.bullish_cross() {
            return Err(Rejection::NoMomentumCross);
        }

        let (hourly, minute) = tokio::join!(
            self.fetch(ticker, Timeframe::Hourly),
            self.fetch(ticker, Timeframe::Minute),
        );
        let (hourly, minute) = (hourly?, minute?);

        self.check_above(&hourly, Timeframe::Hourly)?;
        self.check_above(&minute, Timeframe::Minute)?;
        Ok(())
    }

    async fn fetch(&self, ticker: &str, timeframe: Timeframe) -> Result<PriceSeries, Rejection> {
        match self
            .provider
            .fetch_series(ticker, timeframe.period(), timeframe.interval())
            .await
        {
            Ok(series) if !series.is_empty() => Ok(series),
            Ok(_) => {
                debug!(ticker, %timeframe, "Empty series");
                Err(Rejection::ProviderUnavailable(timeframe))
            }
            Err(e) => {
                debug!(ticker, %timeframe, error = %e, "Fetch failed");
                Err(Rejection::ProviderUnavailable(timeframe))
            }
        }
    }

    fn check_above(&self, series: &PriceSeries, timeframe: Timeframe) -> Result<(), Rejection> {
        match self.evaluator.position(series) {
            CloudPosition::Above => Ok(()),
            CloudPosition::InsufficientHistory => Err(Rejection::InsufficientHistory(timeframe)),
            CloudPosition::NotAbove | CloudPosition::Undefined => {
                Err(Rejection::BelowCloud(timeframe))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
