// In crates/strategies/src/lib.rs

use core_types::{Evaluation, Kline};
pub mod error;
pub mod golden_cross;
pub mod types;

pub use error::{Error, Result};
pub use golden_cross::GoldenCross;

/// The interface for a signal evaluator.
///
/// An evaluator looks at a time-ordered daily series for one instrument and
/// decides the signal for the latest session. Evaluators hold no state between
/// calls, so one instance can be reused for every ticker in a run.
pub trait SignalEvaluator {
    /// The name of the evaluator.
    fn name(&self) -> &'static str;

    fn evaluate(&self, klines: &[Kline]) -> core_types::Result<Evaluation>;
}
