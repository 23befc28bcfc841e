// In app/src/runner.rs

use api_client::PriceProvider;
use core_types::{Evaluation, Ticker};
use strategies::SignalEvaluator;

/// Fetches and evaluates one ticker. Every failure is returned, not raised,
/// so the caller can keep going with the next ticker.
pub async fn evaluate_ticker<P, E>(provider: &P, evaluator: &E, ticker: &Ticker) -> core_types::Result<Evaluation>
where
    P: PriceProvider + ?Sized,
    E: SignalEvaluator + ?Sized,
{
    let klines = provider.daily_series(&ticker.symbol).await?;
    tracing::debug!(ticker = %ticker.name, bars = klines.len(), "Fetched daily series.");
    evaluator.evaluate(&klines)
}

/// Evaluates every ticker in order, one at a time.
///
/// The result has exactly one entry per ticker, aligned with `tickers`.
pub async fn collect_outcomes<P, E>(provider: &P, evaluator: &E, tickers: &[Ticker]) -> Vec<core_types::Result<Evaluation>>
where
    P: PriceProvider + ?Sized,
    E: SignalEvaluator + ?Sized,
{
    let mut outcomes = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        tracing::info!(ticker = %ticker.name, symbol = %ticker.symbol, "Evaluating ticker...");
        outcomes.push(evaluate_ticker(provider, evaluator, ticker).await);
    }
    outcomes
}
