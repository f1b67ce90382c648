//! Ticker-universe providers.
//!
//! Defines the `UniverseProvider` trait, symbol normalisation, and a
//! static list provider. The S&P 500 list from Wikipedia lives in
//! [`wikipedia`].

pub mod wikipedia;

use anyhow::Result;
use async_trait::async_trait;

/// Source of the symbols to scan.
///
/// Implementors return normalised, unique symbols in a stable order.
#[async_trait]
pub trait UniverseProvider: Send + Sync {
    async fn tickers(&self) -> Result<Vec<String>>;
}

/// Normalise a raw exchange symbol for the market-data provider.
/// Share-class dots become dashes (`BRK.B` → `BRK-B`).
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().replace('.', "-")
}

/// Normalise a list of raw symbols, dropping blanks and duplicates while
/// keeping first-seen order.
pub fn normalize_universe<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    raw.into_iter()
        .map(|s| normalize_symbol(s.as_ref()))
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Fixed universe from configuration.
pub struct StaticUniverse {
    tickers: Vec<String>,
}

impl StaticUniverse {
    pub fn new<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tickers: normalize_universe(tickers),
        }
    }
}

#[async_trait]
impl UniverseProvider for StaticUniverse {
    async fn tickers(&self) -> Result<Vec<String>> {
        Ok(self.tickers.clone())
    }
}
