// In crates/app-config/src/types.rs

use serde::Deserialize;

use core_types::Ticker;
use report::{MarketFormats, ReportSettings};
use strategies::types::GoldenCrossSettings;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    /// Settings for the price history provider.
    #[serde(default)]
    pub provider: ProviderSettings,
    /// Moving-average windows and the minimum history length.
    #[serde(default)]
    pub strategy: GoldenCrossSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProviderSettings {
    /// The base URL of the chart API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Calendar days of history to request per ticker.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            lookback_days: default_lookback_days(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

// --- Structs for watchlist.toml ---

/// The tickers to report on, in display order, and how each market formats numbers.
#[derive(Deserialize, Debug, Clone)]
pub struct Watchlist {
    #[serde(default)]
    pub markets: MarketFormats,
    pub tickers: Vec<Ticker>,
}

/// Helper functions for serde defaults
fn default_environment() -> String { "development".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_base_url() -> String { "https://query1.finance.yahoo.com".to_string() }
fn default_lookback_days() -> u32 { 60 }
fn default_timeout_secs() -> u64 { 10 }
fn default_user_agent() -> String { "Mozilla/5.0 (compatible; golden-cross-report/0.1)".to_string() }
