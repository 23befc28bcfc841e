// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{ProviderSettings, Settings, Watchlist};

/// The directory holding `base.toml` and `watchlist.toml`.
///
/// Defaults to `config`, overridable with `APP_CONFIG_DIR`.
pub fn config_dir() -> PathBuf {
    std::env::var("APP_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"))
}

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_from(&config_dir(), &environment)
}

pub fn load_settings_from(dir: &Path, environment: &str) -> Result<Settings> {
    let settings = Config::builder()
        .add_source(File::with_name(&dir.join("base").to_string_lossy()))
        .add_source(File::with_name(&dir.join(environment).to_string_lossy()).required(false))
        // e.g. `APP__REPORT__OUTPUT_PATH=docs/README.md`
        .add_source(Environment::with_prefix("APP").separator("__"))
        .set_override("app.environment", environment)?
        .build()?;

    let settings: Settings = settings.try_deserialize()?;

    Ok(settings)
}

/// Loads the ticker watchlist from `watchlist.toml` in the config directory.
pub fn load_watchlist() -> Result<Watchlist> {
    load_watchlist_from(&config_dir().join("watchlist.toml"))
}

pub fn load_watchlist_from(path: &Path) -> Result<Watchlist> {
    let content = std::fs::read_to_string(path)?;

    let watchlist: Watchlist = toml::from_str(&content)?;
    if watchlist.tickers.is_empty() {
        return Err(Error::EmptyWatchlist(path.to_path_buf()));
    }
    Ok(watchlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use report::FailedRowPolicy;
    use std::fs;

    const BASE: &str = r#"
[app]
log_level = "info"

[provider]
lookback_days = 60

[strategy]
short_period = 5
long_period = 20
min_bars = 25

[report]
output_path = "README.md"
"#;

    const WATCHLIST: &str = r#"
[markets.krx]
decimals = 0

[markets.us]
decimals = 2

[[tickers]]
name = "Samsung Electronics"
symbol = "005930.KS"
market = "krx"

[[tickers]]
name = "Apple"
symbol = "AAPL"
market = "us"

[[tickers]]
name = "Bitcoin"
symbol = "BTC-USD"
market = "crypto"

[[tickers]]
name = "Tesla"
symbol = "TSLA"
"#;

    #[test]
    fn test_base_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE).unwrap();

        let settings = load_settings_from(dir.path(), "development").unwrap();

        assert_eq!(settings.app.environment, "development");
        assert_eq!(settings.provider.lookback_days, 60);
        assert_eq!(settings.provider.base_url, "https://query1.finance.yahoo.com");
        assert_eq!(settings.strategy.long_period, 20);
        assert_eq!(settings.report.failed_rows, FailedRowPolicy::Placeholder);
        assert_eq!(settings.report.labels.waiting, "대기");
    }

    #[test]
    fn test_environment_file_overrides_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE).unwrap();
        fs::write(
            dir.path().join("production.toml"),
            "[app]\nlog_level = \"warn\"\n\n[report]\nfailed_rows = \"skip\"\ninclude_footer = false\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), "production").unwrap();

        assert_eq!(settings.app.environment, "production");
        assert_eq!(settings.app.log_level, "warn");
        assert_eq!(settings.report.failed_rows, FailedRowPolicy::Skip);
        assert!(!settings.report.include_footer);
    }

    #[test]
    fn test_missing_base_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings_from(dir.path(), "development").is_err());
    }

    #[test]
    fn test_watchlist_keeps_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.toml");
        fs::write(&path, WATCHLIST).unwrap();

        let watchlist = load_watchlist_from(&path).unwrap();

        let symbols: Vec<&str> = watchlist.tickers.iter().map(|t| t.symbol.0.as_str()).collect();
        assert_eq!(symbols, ["005930.KS", "AAPL", "BTC-USD", "TSLA"]);
        assert_eq!(watchlist.tickers[3].market, "us");
        assert_eq!(watchlist.markets.for_market("krx").decimals, 0);
    }

    #[test]
    fn test_empty_watchlist_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.toml");
        fs::write(&path, "tickers = []\n").unwrap();

        assert!(matches!(load_watchlist_from(&path), Err(Error::EmptyWatchlist(_))));
    }
}
