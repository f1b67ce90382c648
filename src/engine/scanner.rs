//! Universe scanner.
//!
//! Fans the decision pipeline out over every ticker with a fixed number
//! of pipelines in flight, collects the verdicts, and builds the sorted
//! scan result. One ticker's failure, panic or timeout only affects that
//! ticker's verdict.

use anyhow::Result;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::ScanConfig;
use crate::strategy::DecisionPipeline;
use crate::types::{Rejection, ScanResult, Verdict};
use crate::universe::UniverseProvider;

/// Runs full scans over the configured universe.
pub struct Scanner {
    universe: Arc<dyn UniverseProvider>,
    pipeline: Arc<DecisionPipeline>,
    concurrency: usize,
    timeout: Option<Duration>,
}

impl Scanner {
    pub fn new(
        universe: Arc<dyn UniverseProvider>,
        pipeline: Arc<DecisionPipeline>,
        config: &ScanConfig,
    ) -> Self {
        Self {
            universe,
            pipeline,
            concurrency: config.concurrency.max(1),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Load the universe and scan it. A universe failure is the only
    /// error that surfaces; per-ticker problems become rejections.
    pub async fn run(&self) -> Result<ScanResult> {
        let scan_id = Uuid::new_v4();
        let span = info_span!("scan", %scan_id);

        async {
            let tickers = self.universe.tickers().await?;
            Ok::<_, anyhow::Error>(self.scan_tickers(&tickers).await)
        }
        .instrument(span)
        .await
    }

    /// Evaluate every ticker and aggregate the qualifying ones.
    pub async fn scan_tickers(&self, tickers: &[String]) -> ScanResult {
        let started = Instant::now();
        let deadline = self.timeout.map(|t| tokio::time::Instant::now() + t);

        info!(
            tickers = tickers.len(),
            concurrency = self.concurrency,
            timeout_secs = ?self.timeout.map(|t| t.as_secs()),
            "Starting scan"
        );

        let verdicts: Vec<(String, Verdict)> = stream::iter(tickers.iter().cloned())
            .map(|ticker| {
                let pipeline = Arc::clone(&self.pipeline);
                let task_ticker = ticker.clone();
                let handle = AbortOnDrop(tokio::spawn(
                    async move {
                        match deadline {
                            Some(at) => tokio::time::timeout_at(at, pipeline.evaluate(&task_ticker))
                                .await
                                .unwrap_or(Verdict::Rejected(Rejection::TimedOut)),
                            None => pipeline.evaluate(&task_ticker).await,
                        }
                    }
                    .in_current_span(),
                ));

                async move {
                    let mut handle = handle;
                    let verdict = (&mut handle.0).await.unwrap_or_else(|e| {
                        warn!(ticker = %ticker, error = %e, "Pipeline worker failed");
                        Verdict::Rejected(Rejection::WorkerFailed)
                    });
                    (ticker, verdict)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let result = aggregate(tickers.len(), verdicts);

        info!(
            qualifying = result.count(),
            scanned = result.total_scanned,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Scan complete"
        );

        result
    }
}

/// Aborts the worker when the scan future is dropped mid-flight, so an
/// abandoned scan stops fetching.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Fold verdicts into a scan result, sorting the qualifying tickers.
fn aggregate(total: usize, verdicts: Vec<(String, Verdict)>) -> ScanResult {
    let mut qualifying = Vec::new();
    let mut rejections: BTreeMap<String, usize> = BTreeMap::new();

    for (ticker, verdict) in verdicts {
        match verdict {
            Verdict::Qualifies => {
                debug!(ticker = %ticker, "Qualifies");
                qualifying.push(ticker);
            }
            Verdict::Rejected(reason) => {
                *rejections.entry(reason.to_string()).or_default() += 1;
            }
        }
    }

    qualifying.sort();
    info!(?rejections, "Rejection tally");

    ScanResult {
        timestamp: Utc::now(),
        qualifying,
        total_scanned: total,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
