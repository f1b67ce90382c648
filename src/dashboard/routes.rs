//! Report route handlers.
//!
//! `/screen` runs a full scan on every call and returns the JSON report;
//! nothing is cached between calls.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::engine::scanner::Scanner;
use crate::types::ScanResult;

/// Static liveness text served at `/`.
pub const HOME_TEXT: &str = "Stock screener API is running. Call /screen for results.";

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub scanner: Scanner,
}

impl DashboardState {
    pub fn new(scanner: Scanner) -> Self {
        Self { scanner }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ScreenReport {
    /// UTC, second precision, e.g. `2026-02-21T12:00:00Z`.
    pub timestamp: String,
    pub bullish_stocks: Vec<String>,
    pub bullish_stocks_str: String,
    pub count: usize,
    pub total_scanned: usize,
    pub report_title: String,
    pub report_body: String,
}

impl From<&ScanResult> for ScreenReport {
    fn from(result: &ScanResult) -> Self {
        let count = result.count();
        let joined = result.qualifying.join(", ");
        let date = result.timestamp.format("%Y-%m-%d");

        let report_body = format!(
            "Found {count} stocks meeting all criteria (close above Ichimoku cloud on 1m/1h/daily + daily MACD bullish cross):\n\n{}",
            if joined.is_empty() { "None today." } else { joined.as_str() }
        );

        Self {
            timestamp: result.timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            bullish_stocks: result.qualifying.clone(),
            bullish_stocks_str: joined.clone(),
            count,
            total_scanned: result.total_scanned,
            report_title: format!("Bullish Signals — {count} found ({date})"),
            report_body,
        }
    }
}

/// Errors surfaced to HTTP callers. Only scan-wide failures get here.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("scan failed: {0}")]
    ScanFailed(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::ScanFailed(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /
pub async fn home() -> &'static str {
    HOME_TEXT
}

/// GET /screen
pub async fn screen(State(state): State<AppState>) -> Result<Json<ScreenReport>, ApiError> {
    let result = state.scanner.run().await.map_err(|e| {
        error!(error = %e, "Scan failed");
        ApiError::from(e)
    })?;
    info!(count = result.count(), total = result.total_scanned, "Screen served");
    Ok(Json(ScreenReport::from(&result)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
