//! The report API over a scripted universe.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use screener::config::ScanConfig;
use screener::dashboard::build_router;
use screener::dashboard::routes::DashboardState;
use screener::engine::scanner::Scanner;
use screener::strategy::{DecisionPipeline, StrategyConfig};
use screener::universe::StaticUniverse;

use crate::mock_provider::MockProvider;

#[tokio::test]
async fn test_screen_report_json() {
    let provider = Arc::new(MockProvider::new().bullish("BBB").bullish("AAA"));
    let pipeline = Arc::new(DecisionPipeline::new(provider, StrategyConfig::default()));
    let scanner = Scanner::new(
        Arc::new(StaticUniverse::new(["BBB", "CCC", "AAA"])),
        pipeline,
        &ScanConfig::default(),
    );
    let app = build_router(Arc::new(DashboardState::new(scanner)));

    let resp = app
        .oneshot(Request::builder().uri("/screen").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["bullish_stocks"], serde_json::json!(["AAA", "BBB"]));
    assert_eq!(json["bullish_stocks_str"], "AAA, BBB");
    assert_eq!(json["count"], 2);
    assert_eq!(json["total_scanned"], 3);

    let title = json["report_title"].as_str().unwrap();
    assert!(title.starts_with("Bullish Signals — 2 found ("));
    let body = json["report_body"].as_str().unwrap();
    assert!(body.starts_with("Found 2 stocks meeting all criteria"));
    assert!(body.ends_with("AAA, BBB"));

    let ts = json["timestamp"].as_str().unwrap();
    assert_eq!(ts.len(), 20);
    assert!(ts.ends_with('Z'));
}
