// In crates/api-client/src/types.rs

use reqwest::{Client, Url};
use serde::Deserialize;

/// The client for the Yahoo Finance chart API.
#[derive(Debug, Clone)]
pub struct YahooClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// The base URL, e.g. `https://query1.finance.yahoo.com`.
    pub base_url: Url,
    /// How many calendar days of history to request.
    pub lookback_days: u32,
}

/// Top-level body of `GET /v8/finance/chart/{symbol}`.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Column-oriented bars: `timestamp[i]` belongs to `quote[0].close[i]`.
///
/// Yahoo omits `timestamp` entirely when the window holds no sessions.
#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

/// Null entries mark sessions without a print (e.g., a bar still forming).
#[derive(Debug, Deserialize, Default)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}
