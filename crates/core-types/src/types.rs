// In crates/core-types/src/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A provider-side instrument identifier (e.g., "AAPL", "005930.KS").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the configured watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// The name shown in the report table.
    pub name: String,
    /// The symbol passed to the price provider.
    pub symbol: Symbol,
    /// Key into the market formatting table (e.g., "krx", "us", "crypto").
    #[serde(default = "default_market")]
    pub market: String,
}

fn default_market() -> String {
    "us".to_string()
}

impl Ticker {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, market: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: Symbol(symbol.into()),
            market: market.into(),
        }
    }
}

/// A single trading-day bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// Session open time in milliseconds since the Unix epoch.
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// The crossover status of the latest session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// The short average crossed above the long average on the latest bar.
    GoldenCross,
    Waiting,
}

/// Moving-average snapshot at the latest bar, kept at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub last_close: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub signal: Signal,
}

/// The non-error outcomes of evaluating a price series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    Ready(EvaluationResult),
    /// Not enough bars to compute both averages at the last two sessions.
    InsufficientData { bars: usize },
}

impl Evaluation {
    pub fn result(&self) -> Option<&EvaluationResult> {
        match self {
            Evaluation::Ready(result) => Some(result),
            Evaluation::InsufficientData { .. } => None,
        }
    }
}
