// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GoldenCrossSettings {
    /// Window of the short-term average, in bars.
    #[serde(default = "default_short_period")]
    pub short_period: usize,
    /// Window of the long-term average, in bars.
    #[serde(default = "default_long_period")]
    pub long_period: usize,
    /// Series shorter than this are reported as insufficient data.
    #[serde(default = "default_min_bars")]
    pub min_bars: usize,
}

impl Default for GoldenCrossSettings {
    fn default() -> Self {
        Self {
            short_period: default_short_period(),
            long_period: default_long_period(),
            min_bars: default_min_bars(),
        }
    }
}

impl GoldenCrossSettings {
    pub fn validate(&self) -> Result<()> {
        if self.short_period == 0 {
            return Err(Error::InvalidSettings("short_period must be greater than 0".into()));
        }
        if self.short_period >= self.long_period {
            return Err(Error::InvalidSettings(format!(
                "short_period ({}) must be smaller than long_period ({})",
                self.short_period, self.long_period
            )));
        }
        // Two bars are needed to compare the previous and the latest session.
        if self.min_bars < 2 {
            return Err(Error::InvalidSettings("min_bars must be at least 2".into()));
        }
        Ok(())
    }
}

fn default_short_period() -> usize { 5 }
fn default_long_period() -> usize { 20 }
fn default_min_bars() -> usize { 25 }
