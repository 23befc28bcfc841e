// In crates/report/src/types.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ReportSettings {
    /// The file that is replaced on every run.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_emoji")]
    pub emoji: String,
    /// Append the signal guide and disclaimer.
    #[serde(default = "default_include_footer")]
    pub include_footer: bool,
    #[serde(default)]
    pub failed_rows: FailedRowPolicy,
    #[serde(default)]
    pub labels: Labels,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            title: default_title(),
            emoji: default_emoji(),
            include_footer: default_include_footer(),
            failed_rows: FailedRowPolicy::default(),
            labels: Labels::default(),
        }
    }
}

/// What to do with a ticker whose price history could not be fetched or parsed.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailedRowPolicy {
    /// Keep one row per ticker, marked with the `failed` label.
    #[default]
    Placeholder,
    /// Leave the ticker out of the table (it is still logged).
    Skip,
}

/// Text used in the signal column and the footer guide.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Labels {
    pub golden_cross: String,
    pub waiting: String,
    pub no_data: String,
    pub failed: String,
    /// Filler for numeric cells of placeholder rows.
    pub empty_cell: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            golden_cross: "🔥 매수 신호 (골든크로스)".to_string(),
            waiting: "대기".to_string(),
            no_data: "데이터 부족".to_string(),
            failed: "조회 실패".to_string(),
            empty_cell: "-".to_string(),
        }
    }
}

/// Number formatting convention of one market.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketFormat {
    /// Digits after the decimal point; 0 renders whole currency units.
    pub decimals: u8,
}

impl Default for MarketFormat {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

impl MarketFormat {
    pub fn format(&self, value: f64) -> String {
        format!("{:.*}", usize::from(self.decimals), value)
    }
}

/// Market key (e.g., "krx") to its formatting convention.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct MarketFormats(pub BTreeMap<String, MarketFormat>);

impl MarketFormats {
    /// Unknown markets fall back to [`MarketFormat::default`].
    pub fn for_market(&self, market: &str) -> MarketFormat {
        match self.0.get(market) {
            Some(format) => *format,
            None => {
                tracing::debug!(market, "No format configured for market, using default.");
                MarketFormat::default()
            }
        }
    }
}

fn default_output_path() -> PathBuf { PathBuf::from("README.md") }
fn default_title() -> String { "주식/코인 골든크로스 리포트".to_string() }
fn default_emoji() -> String { "📈".to_string() }
fn default_include_footer() -> bool { true }
