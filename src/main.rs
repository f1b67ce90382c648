//! SCREENER: multi-timeframe Ichimoku + MACD equity screener.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the market-data and universe providers into the scanner, and
//! serves the report API until Ctrl+C.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use screener::config::{self, UniverseSource};
use screener::dashboard::{self, routes::DashboardState};
use screener::data::yahoo::YahooClient;
use screener::engine::scanner::Scanner;
use screener::strategy::DecisionPipeline;
use screener::universe::wikipedia::WikipediaUniverse;
use screener::universe::{StaticUniverse, UniverseProvider};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path =
        std::env::var("SCREENER_CONFIG").unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::AppConfig::load_or_default(&config_path)?;

    init_logging();

    info!(
        config = %config_path,
        universe = ?cfg.universe.source,
        concurrency = cfg.scan.concurrency,
        timeout_secs = ?cfg.scan.timeout_secs,
        min_bars = cfg.strategy.min_bars,
        "SCREENER starting up"
    );

    // -- Initialise components -------------------------------------------

    let provider = Arc::new(YahooClient::new(&cfg.market_data)?);

    let universe: Arc<dyn UniverseProvider> = match cfg.universe.source {
        UniverseSource::Wikipedia => Arc::new(WikipediaUniverse::new(&cfg.universe.url)?),
        UniverseSource::Static => {
            info!(count = cfg.universe.tickers.len(), "Using static universe");
            Arc::new(StaticUniverse::new(&cfg.universe.tickers))
        }
    };

    let pipeline = Arc::new(DecisionPipeline::new(provider, cfg.strategy.clone()));
    let scanner = Scanner::new(universe, pipeline, &cfg.scan);
    let state = Arc::new(DashboardState::new(scanner));

    // -- Serve -----------------------------------------------------------

    let addr: SocketAddr = format!("{}:{}", cfg.server.bind, cfg.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", cfg.server.bind, cfg.server.port))?;

    dashboard::serve(state, addr, shutdown_signal()).await?;

    info!("SCREENER shut down cleanly.");
    Ok(())
}

/// Resolves on Ctrl+C. In-flight scans are abandoned.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("screener=info"));

    let json_logging = std::env::var("SCREENER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
