// In crates/report/src/lib.rs

pub mod error;
pub mod render;
pub mod types;
pub mod writer;

pub use error::{Error, Result};
pub use render::{Report, ReportDefinition, ReportRow};
pub use types::{FailedRowPolicy, Labels, MarketFormat, MarketFormats, ReportSettings};
pub use writer::write_atomically;
