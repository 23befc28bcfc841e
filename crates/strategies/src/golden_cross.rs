// In crates/strategies/src/golden_cross.rs

use crate::error::Result;
use crate::types::GoldenCrossSettings;
use crate::SignalEvaluator;
use core_types::{Error as EvaluationError, Evaluation, EvaluationResult, Kline, Signal};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;
use ta::indicators::SimpleMovingAverage as Sma;
use ta::Next;

/// Detects a short-term simple moving average crossing above a long-term one
/// between the previous and the latest session.
#[derive(Debug, Clone)]
pub struct GoldenCross {
    settings: GoldenCrossSettings,
    // Template indicators, cloned fresh for every series.
    short_sma: Sma,
    long_sma: Sma,
}

impl GoldenCross {
    /// Creates a new `GoldenCross` evaluator, rejecting inconsistent settings.
    pub fn new(settings: GoldenCrossSettings) -> Result<Self> {
        settings.validate()?;
        let short_sma = Sma::new(settings.short_period)
            .map_err(|e| crate::Error::InvalidSettings(format!("{e:?}")))?;
        let long_sma = Sma::new(settings.long_period)
            .map_err(|e| crate::Error::InvalidSettings(format!("{e:?}")))?;
        Ok(Self { settings, short_sma, long_sma })
    }

    pub fn settings(&self) -> &GoldenCrossSettings {
        &self.settings
    }

    /// How the short average compares to the long one at bar `end`, or `None`
    /// while the long window is not yet full.
    ///
    /// Compares `long * sum_short` with `short * sum_long`, so no division
    /// (and no rounding) is involved.
    fn average_ordering(&self, closes: &[Decimal], end: usize) -> core_types::Result<Option<Ordering>> {
        let (short, long) = (self.settings.short_period, self.settings.long_period);
        if end + 1 < long {
            return Ok(None);
        }
        let window_sum = |period: usize| closes[end + 1 - period..=end].iter().sum::<Decimal>();
        let overflow = || EvaluationError::Format(format!("moving-average sums overflow at bar {end}"));
        let lhs = window_sum(short).checked_mul(Decimal::from(long)).ok_or_else(overflow)?;
        let rhs = window_sum(long).checked_mul(Decimal::from(short)).ok_or_else(overflow)?;
        Ok(Some(lhs.cmp(&rhs)))
    }
}

impl SignalEvaluator for GoldenCross {
    fn name(&self) -> &'static str {
        "GoldenCross"
    }

    fn evaluate(&self, klines: &[Kline]) -> core_types::Result<Evaluation> {
        // 1. Short series are a normal outcome (new listings, provider gaps).
        if klines.len() < self.settings.min_bars {
            return Ok(Evaluation::InsufficientData { bars: klines.len() });
        }

        // 2. Reject series the averages would silently turn into garbage.
        validate_series(klines)?;

        let closes: Vec<f64> = klines.iter().map(|k| k.close).collect();
        let short = trailing_sma(self.short_sma.clone(), self.settings.short_period, &closes);
        let long = trailing_sma(self.long_sma.clone(), self.settings.long_period, &closes);

        let last = closes.len() - 1;
        let prev = last - 1;
        let (Some(short_last), Some(long_last)) = (short[last], long[last]) else {
            return Ok(Evaluation::InsufficientData { bars: klines.len() });
        };

        // 3. The crossover test runs on exact decimal sums: f64 averages of
        //    cent prices that are equal on paper rarely compare equal.
        let exact = exact_closes(klines)?;
        let (Some(prev_order), Some(last_order)) = (
            self.average_ordering(&exact, prev)?,
            self.average_ordering(&exact, last)?,
        ) else {
            return Ok(Evaluation::InsufficientData { bars: klines.len() });
        };

        let signal = if is_golden_cross(prev_order, last_order) {
            Signal::GoldenCross
        } else {
            Signal::Waiting
        };

        tracing::debug!(
            bars = klines.len(),
            ?prev_order,
            ?last_order,
            short_last,
            long_last,
            ?signal,
            "Evaluated moving averages."
        );

        Ok(Evaluation::Ready(EvaluationResult {
            last_close: closes[last],
            ma_short: short_last,
            ma_long: long_last,
            signal,
        }))
    }
}

/// Strict on both sides: touching averages are not a cross.
///
/// Each argument is the ordering of the short average against the long one.
pub fn is_golden_cross(prev: Ordering, last: Ordering) -> bool {
    prev == Ordering::Less && last == Ordering::Greater
}

/// Closes as the decimals they were quoted as. `f64`'s `Display` is the
/// shortest string that round-trips, so 866.05 becomes exactly 866.05.
fn exact_closes(klines: &[Kline]) -> core_types::Result<Vec<Decimal>> {
    klines
        .iter()
        .map(|k| {
            Decimal::from_str(&k.close.to_string()).map_err(|e| {
                EvaluationError::Format(format!("close {} at open_time {}: {e}", k.close, k.open_time))
            })
        })
        .collect()
}

/// Trailing average at every bar, `None` until `period` closes have been seen.
fn trailing_sma(mut sma: Sma, period: usize, closes: &[f64]) -> Vec<Option<f64>> {
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let value = sma.next(*close);
            (i + 1 >= period).then_some(value)
        })
        .collect()
}

fn validate_series(klines: &[Kline]) -> core_types::Result<()> {
    if let Some(bad) = klines.iter().find(|k| !k.close.is_finite() || k.close <= 0.0) {
        return Err(EvaluationError::Format(format!(
            "invalid close {} at open_time {}",
            bad.close, bad.open_time
        )));
    }
    if let Some(pair) = klines.windows(2).find(|w| w[1].open_time <= w[0].open_time) {
        return Err(EvaluationError::Format(format!(
            "bars out of order: {} followed by {}",
            pair[0].open_time, pair[1].open_time
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 86_400_000;

    fn klines_from_closes(closes: &[f64]) -> Vec<Kline> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Kline {
                open_time: i as i64 * DAY_MS,
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000.0,
            })
            .collect()
    }

    fn evaluator() -> GoldenCross {
        GoldenCross::new(GoldenCrossSettings::default()).unwrap()
    }

    fn ready(evaluation: Evaluation) -> EvaluationResult {
        match evaluation {
            Evaluation::Ready(result) => result,
            other => panic!("expected a ready evaluation, got {other:?}"),
        }
    }

    #[test]
    fn test_short_series_is_insufficient() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let evaluation = evaluator().evaluate(&klines_from_closes(&closes)).unwrap();
        assert_eq!(evaluation, Evaluation::InsufficientData { bars: 10 });
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let evaluation = evaluator().evaluate(&[]).unwrap();
        assert_eq!(evaluation, Evaluation::InsufficientData { bars: 0 });
    }

    #[test]
    fn test_24_bars_is_insufficient() {
        let closes = vec![100.0; 24];
        let evaluation = evaluator().evaluate(&klines_from_closes(&closes)).unwrap();
        assert_eq!(evaluation, Evaluation::InsufficientData { bars: 24 });
    }

    #[test]
    fn test_undefined_long_average_is_insufficient() {
        let settings = GoldenCrossSettings { min_bars: 10, ..Default::default() };
        let evaluator = GoldenCross::new(settings).unwrap();
        let closes = vec![100.0; 12];
        let evaluation = evaluator.evaluate(&klines_from_closes(&closes)).unwrap();
        assert_eq!(evaluation, Evaluation::InsufficientData { bars: 12 });
    }

    #[test]
    fn test_flat_series_waits() {
        let closes = vec![100.0; 30];
        let result = ready(evaluator().evaluate(&klines_from_closes(&closes)).unwrap());
        assert_eq!(result.ma_short, result.ma_long);
        assert_eq!(result.signal, Signal::Waiting);
    }

    #[test]
    fn test_steady_rise_waits_with_hand_computed_averages() {
        // 100, 101, ..., 124: the short average is already above the long one
        // on the previous bar, so there is no fresh cross.
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let result = ready(evaluator().evaluate(&klines_from_closes(&closes)).unwrap());
        assert_eq!(result.last_close, 124.0);
        assert!((result.ma_short - 122.0).abs() < 1e-9);
        assert!((result.ma_long - 114.5).abs() < 1e-9);
        assert_eq!(result.signal, Signal::Waiting);
    }

    #[test]
    fn test_cross_on_last_bar() {
        let mut closes = vec![100.0; 23];
        closes.extend([98.0, 110.0]);
        // prev: ma5 = 99.6 < ma20 = 99.9; last: ma5 = 101.6 > ma20 = 100.4
        let result = ready(evaluator().evaluate(&klines_from_closes(&closes)).unwrap());
        assert!((result.ma_short - 101.6).abs() < 1e-9);
        assert!((result.ma_long - 100.4).abs() < 1e-9);
        assert_eq!(result.signal, Signal::GoldenCross);
    }

    #[test]
    fn test_equal_averages_on_previous_bar_do_not_cross() {
        let mut closes = vec![100.0; 24];
        closes.push(110.0);
        let result = ready(evaluator().evaluate(&klines_from_closes(&closes)).unwrap());
        assert!(result.ma_short > result.ma_long);
        assert_eq!(result.signal, Signal::Waiting);
    }

    #[test]
    fn test_downward_cross_waits() {
        let mut closes = vec![100.0; 23];
        closes.extend([102.0, 90.0]);
        let result = ready(evaluator().evaluate(&klines_from_closes(&closes)).unwrap());
        assert!(result.ma_short < result.ma_long);
        assert_eq!(result.signal, Signal::Waiting);
    }

    #[test]
    fn test_is_golden_cross_is_strict() {
        use Ordering::{Equal, Greater, Less};
        assert!(is_golden_cross(Less, Greater));
        assert!(!is_golden_cross(Equal, Greater));
        assert!(!is_golden_cross(Less, Equal));
        assert!(!is_golden_cross(Greater, Greater));
        assert!(!is_golden_cross(Less, Less));
    }

    #[test]
    fn test_equal_cent_averages_on_previous_bar_do_not_cross() {
        // Both averages are exactly 130.876 on the previous bar, but in f64
        // the short one comes out a hair below the long one.
        let closes = [
            17.39, 161.28, 126.47, 65.06, 87.73, 48.36, 171.77, 29.31, 81.5, 261.73, 104.18, 52.38,
            251.94, 91.13, 140.38, 138.1, 295.54, 172.69, 36.4, 64.51, 157.18, 141.61, 190.04,
            101.04, 151.04,
        ];
        let result = ready(evaluator().evaluate(&klines_from_closes(&closes)).unwrap());
        assert!(result.ma_short > result.ma_long);
        assert_eq!(result.signal, Signal::Waiting);
    }

    #[test]
    fn test_cent_prices_still_cross() {
        // Same history with the previous close lowered by a cent: the short
        // average is then strictly below on the previous bar.
        let closes = [
            17.39, 161.28, 126.47, 65.06, 87.73, 48.36, 171.77, 29.31, 81.5, 261.73, 104.18, 52.38,
            251.94, 91.13, 140.38, 138.1, 295.54, 172.69, 36.4, 64.51, 157.18, 141.61, 190.04,
            101.03, 151.04,
        ];
        let result = ready(evaluator().evaluate(&klines_from_closes(&closes)).unwrap());
        assert_eq!(result.signal, Signal::GoldenCross);
    }

    #[test]
    fn test_non_finite_close_is_a_format_error() {
        let mut closes = vec![100.0; 25];
        closes[7] = f64::NAN;
        let err = evaluator().evaluate(&klines_from_closes(&closes)).unwrap_err();
        assert!(matches!(err, EvaluationError::Format(_)));
    }

    #[test]
    fn test_unordered_bars_are_a_format_error() {
        let mut klines = klines_from_closes(&vec![100.0; 25]);
        klines.swap(3, 4);
        let err = evaluator().evaluate(&klines).unwrap_err();
        assert!(matches!(err, EvaluationError::Format(_)));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let inverted = GoldenCrossSettings { short_period: 20, long_period: 5, ..Default::default() };
        assert!(GoldenCross::new(inverted).is_err());
        let zero = GoldenCrossSettings { short_period: 0, ..Default::default() };
        assert!(GoldenCross::new(zero).is_err());
        let one_bar = GoldenCrossSettings { min_bars: 1, ..Default::default() };
        assert!(GoldenCross::new(one_bar).is_err());
    }
}
