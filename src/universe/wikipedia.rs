//! S&P 500 constituents from Wikipedia.
//!
//! Page: `https://en.wikipedia.org/wiki/List_of_S%26P_500_companies`
//! The first table (`id="constituents"`) lists one company per row with
//! the ticker in the first cell. Only that column is read.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::{normalize_universe, UniverseProvider};
use crate::types::ScreenerError;

const TABLE_MARKER: &str = "id=\"constituents\"";

/// Wikipedia-backed universe provider.
pub struct WikipediaUniverse {
    http: Client,
    url: String,
}

impl WikipediaUniverse {
    pub fn new(url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("screener/0.1 (equity-screener)")
            .build()
            .context("Failed to build HTTP client for Wikipedia")?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl UniverseProvider for WikipediaUniverse {
    async fn tickers(&self) -> Result<Vec<String>> {
        debug!(url = %self.url, "Fetching constituents page");

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("Wikipedia request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(ScreenerError::Universe(format!("Wikipedia returned {status}")).into());
        }

        let html = resp.text().await.context("Failed to read Wikipedia page")?;
        let raw = extract_constituents(&html);
        let tickers = normalize_universe(&raw);
        if tickers.is_empty() {
            return Err(ScreenerError::Universe("no constituents found on page".into()).into());
        }

        info!(count = tickers.len(), "Universe loaded from Wikipedia");
        Ok(tickers)
    }
}

// ---------------------------------------------------------------------------
// HTML extraction
// ---------------------------------------------------------------------------

/// Raw first-column text of every data row in the constituents table.
fn extract_constituents(html: &str) -> Vec<String> {
    let Some(start) = html.find(TABLE_MARKER) else {
        return Vec::new();
    };
    let table = &html[start..];
    let table = match table.find("</table>") {
        Some(end) => &table[..end],
        None => table,
    };

    table
        .split("<tr")
        .skip(1)
        .filter_map(first_cell)
        .map(|cell| decode_entities(&strip_tags(cell)).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Inner HTML of the first `<td>` in a row; header rows have none.
fn first_cell(row: &str) -> Option<&str> {
    let open = row.find("<td")?;
    let after_open = &row[open..];
    let body_start = after_open.find('>')? + 1;
    let body = &after_open[body_start..];
    let end = body.find("</td>").unwrap_or(body.len());
    Some(&body[..end])
}

fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&#46;", ".")
        .replace("&nbsp;", " ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
