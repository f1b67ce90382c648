//! Full scans through the real pipeline and scanner.

use std::collections::HashMap;
use std::sync::Arc;

use screener::config::ScanConfig;
use screener::engine::scanner::Scanner;
use screener::strategy::{DecisionPipeline, StrategyConfig};
use screener::types::{Interval, Rejection, Timeframe, Verdict};
use screener::universe::StaticUniverse;

use crate::mock_provider::{bullish_daily, downtrend, uptrend, MockProvider, Script};

fn scanner(provider: Arc<MockProvider>, tickers: &[&str]) -> Scanner {
    let pipeline = Arc::new(DecisionPipeline::new(provider, StrategyConfig::default()));
    Scanner::new(
        Arc::new(StaticUniverse::new(tickers.iter().copied())),
        pipeline,
        &ScanConfig::default(),
    )
}

#[tokio::test]
async fn test_one_qualifies_one_has_no_data() {
    let provider = Arc::new(MockProvider::new().bullish("AAA"));
    let result = scanner(provider.clone(), &["AAA", "BBB"]).run().await.unwrap();

    assert_eq!(result.qualifying, vec!["AAA"]);
    assert_eq!(result.count(), 1);
    assert_eq!(result.total_scanned, 2);

    // BBB never got past its empty daily series.
    assert_eq!(provider.calls_for("BBB"), vec![Interval::Daily]);
    assert_eq!(provider.calls_for("AAA").len(), 3);
}

#[tokio::test]
async fn test_result_independent_of_universe_order() {
    let make = || {
        Arc::new(
            MockProvider::new()
                .bullish("MSFT")
                .bullish("AAPL")
                .with("XOM", Script::All(downtrend(200)))
                .with("F", Script::Error("HTTP 500".into())),
        )
    };

    let a = scanner(make(), &["XOM", "MSFT", "F", "AAPL"]).run().await.unwrap();
    let b = scanner(make(), &["AAPL", "F", "MSFT", "XOM"]).run().await.unwrap();

    assert_eq!(a.qualifying, vec!["AAPL", "MSFT"]);
    assert_eq!(a.qualifying, b.qualifying);
    assert_eq!(a.total_scanned, b.total_scanned);
}

#[tokio::test]
async fn test_scan_survives_all_but_one_failing() {
    let mut provider = MockProvider::new().bullish("OK");
    let names: Vec<String> = (0..12).map(|i| format!("ERR{i}")).collect();
    for name in &names {
        provider = provider.with(name, Script::Error("connection reset".into()));
    }
    let mut universe: Vec<&str> = names.iter().map(String::as_str).collect();
    universe.push("OK");

    let result = scanner(Arc::new(provider), &universe).run().await.unwrap();
    assert_eq!(result.qualifying, vec!["OK"]);
    assert_eq!(result.total_scanned, 13);
}

#[tokio::test]
async fn test_panicking_ticker_does_not_abort_scan() {
    let provider = Arc::new(MockProvider::new().bullish("GOOD").with("BOOM", Script::Panic));
    let result = scanner(provider, &["BOOM", "GOOD"]).run().await.unwrap();
    assert_eq!(result.qualifying, vec!["GOOD"]);
    assert_eq!(result.total_scanned, 2);
}

#[tokio::test]
async fn test_intraday_below_cloud_rejects() {
    let mut per = HashMap::new();
    per.insert(Interval::Daily, bullish_daily());
    per.insert(Interval::Minute60, uptrend(300));
    per.insert(Interval::Minute1, downtrend(500));
    let provider = Arc::new(MockProvider::new().with("MIN", Script::PerInterval(per)));

    let pipeline = DecisionPipeline::new(provider, StrategyConfig::default());
    assert_eq!(
        pipeline.evaluate("MIN").await,
        Verdict::Rejected(Rejection::BelowCloud(Timeframe::Minute))
    );
}

#[tokio::test]
async fn test_no_fresh_cross_skips_intraday() {
    let provider = Arc::new(MockProvider::new().with("UP", Script::All(uptrend(300))));
    let pipeline = DecisionPipeline::new(provider.clone(), StrategyConfig::default());

    assert_eq!(
        pipeline.evaluate("UP").await,
        Verdict::Rejected(Rejection::NoMomentumCross)
    );
    assert_eq!(provider.calls_for("UP"), vec![Interval::Daily]);
}

#[tokio::test]
async fn test_short_history_rejected() {
    let provider = Arc::new(MockProvider::new().with("NEW", Script::All(uptrend(99))));
    let pipeline = DecisionPipeline::new(provider, StrategyConfig::default());
    assert_eq!(
        pipeline.evaluate("NEW").await,
        Verdict::Rejected(Rejection::InsufficientHistory(Timeframe::Daily))
    );
}
