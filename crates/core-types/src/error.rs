// In crates/core-types/src/error.rs

use thiserror::Error;

/// Failures that can end the evaluation of a single ticker.
///
/// Insufficient history is deliberately absent: it is a valid outcome,
/// see [`crate::Evaluation::InsufficientData`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Price provider failed: {0}")]
    Provider(String),
    #[error("Malformed price series: {0}")]
    Format(String),
}

pub type Result<T> = std::result::Result<T, Error>;
