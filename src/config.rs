//! Configuration loading from TOML.
//!
//! Reads `config.toml` (or the path in `SCREENER_CONFIG`) and
//! deserializes into strongly-typed structs. Every field has a default,
//! so a missing file or a partial file is valid.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::strategy::StrategyConfig;
use crate::types::ScreenerError;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scan: ScanConfig,
    pub strategy: StrategyConfig,
    pub universe: UniverseConfig,
    pub market_data: MarketDataConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum pipelines in flight at once.
    pub concurrency: usize,
    /// Whole-scan deadline. Tickers still running when it passes do not qualify.
    pub timeout_secs: Option<u64>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 30,
            timeout_secs: None,
        }
    }
}

/// Where the ticker universe comes from.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UniverseSource {
    #[default]
    Wikipedia,
    Static,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UniverseConfig {
    pub source: UniverseSource,
    /// Constituents page for the `wikipedia` source.
    pub url: String,
    /// Symbols for the `static` source.
    pub tickers: Vec<String>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            source: UniverseSource::Wikipedia,
            url: "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies".to_string(),
            tickers: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MarketDataConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) screener/0.1"
                .to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ScreenerError> {
        if self.scan.concurrency == 0 {
            return Err(ScreenerError::Config("scan.concurrency must be at least 1".into()));
        }
        if self.universe.source == UniverseSource::Static && self.universe.tickers.is_empty() {
            return Err(ScreenerError::Config(
                "universe.tickers must not be empty for the static source".into(),
            ));
        }
        self.strategy.validate()
    }
}
