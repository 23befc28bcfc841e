// In crates/api-client/src/lib.rs

use std::time::Duration;

use app_config::types::ProviderSettings;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{Kline, Symbol};
use reqwest::Url;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

/// A source of daily price history.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Returns the recent daily bars for `symbol`, oldest first.
    async fn daily_series(&self, symbol: &Symbol) -> Result<Vec<Kline>>;
}

impl YahooClient {
    /// Constructs a new YahooClient from ProviderSettings.
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| Error::ClientBuildError(format!("invalid base URL {}: {e}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::ClientBuildError(format!("base URL {} cannot hold a path", settings.base_url)));
        }

        Ok(YahooClient {
            http_client,
            base_url,
            lookback_days: settings.lookback_days,
        })
    }

    /// `{base_url}/v8/finance/chart/{symbol}`, with the symbol escaped as a
    /// single path segment.
    pub fn chart_url(&self, symbol: &Symbol) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v8", "finance", "chart", symbol.0.as_str()]);
        }
        url
    }

    /// Fetches daily bars covering the last `lookback_days` calendar days.
    ///
    /// Weekends and holidays mean the returned series holds fewer bars than
    /// `lookback_days`.
    pub async fn fetch_daily_series(&self, symbol: &Symbol, lookback_days: u32) -> Result<Vec<Kline>> {
        let period2 = Utc::now().timestamp();
        let period1 = period2 - i64::from(lookback_days) * 86_400;
        self.get_chart(symbol, period1, period2).await
    }

    /// Fetches daily bars between two Unix timestamps (seconds).
    ///
    /// This corresponds to the `GET /v8/finance/chart/{symbol}` endpoint.
    pub async fn get_chart(&self, symbol: &Symbol, period1: i64, period2: i64) -> Result<Vec<Kline>> {
        let url = self.chart_url(symbol);

        tracing::debug!(%symbol, period1, period2, "Requesting daily chart.");

        let response = self
            .http_client
            .get(url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await
            .map_err(Error::RequestFailed)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::RequestFailed)?;

        // Yahoo reports unknown symbols as a non-2xx status with an error object,
        // so look for that object before judging the status code.
        let parsed = serde_json::from_str::<ChartResponse>(&body);
        if let Ok(ChartResponse { chart: ChartEnvelope { error: Some(err), .. } }) = &parsed {
            return Err(Error::ApiError {
                code: err.code.clone(),
                msg: err.description.clone(),
            });
        }
        if !status.is_success() {
            return Err(Error::HttpStatus { status: status.as_u16(), body });
        }

        let chart = parsed.map_err(Error::DeserializationFailed)?;
        let result = chart
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| Error::MalformedResponse("chart.result is empty".to_string()))?;

        let klines = klines_from_chart(result)?;
        tracing::debug!(%symbol, bars = klines.len(), "Received daily chart.");
        Ok(klines)
    }
}

#[async_trait]
impl PriceProvider for YahooClient {
    async fn daily_series(&self, symbol: &Symbol) -> Result<Vec<Kline>> {
        self.fetch_daily_series(symbol, self.lookback_days).await
    }
}

/// Convert the column-oriented chart into our row-oriented Kline type.
fn klines_from_chart(result: ChartResult) -> Result<Vec<Kline>> {
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let len = result.timestamp.len();

    // Every column Yahoo sent must line up with the timestamps.
    for (name, column) in [
        ("open", &quote.open),
        ("high", &quote.high),
        ("low", &quote.low),
        ("close", &quote.close),
        ("volume", &quote.volume),
    ] {
        if !column.is_empty() && column.len() != len {
            return Err(Error::MalformedResponse(format!(
                "{name} has {} entries for {len} timestamps",
                column.len()
            )));
        }
    }
    if len > 0 && quote.close.is_empty() {
        return Err(Error::MalformedResponse("close column is missing".to_string()));
    }

    let at = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

    let klines = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let close = at(&quote.close, i)?;
            Some(Kline {
                open_time: ts * 1000,
                open: at(&quote.open, i).unwrap_or(close),
                high: at(&quote.high, i).unwrap_or(close),
                low: at(&quote.low, i).unwrap_or(close),
                close,
                volume: at(&quote.volume, i).unwrap_or(0.0),
            })
        })
        .collect();

    Ok(klines)
}

// Free function to allow api_client::new usage
pub fn new(settings: &ProviderSettings) -> Result<YahooClient> {
    YahooClient::new(settings)
}
