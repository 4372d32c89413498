//! Lag and rolling feature derivation over the monthly series.

use chrono::Datelike;

use crate::domain::{FeaturedPoint, TimeSeriesPoint};
use crate::error::AppError;
use crate::math::stats;

/// Longest lookback; points without this much history are dropped.
pub const MAX_LAG: usize = 6;
/// Trailing window for rolling statistics, inclusive of the current point.
pub const ROLLING_WINDOW: usize = 3;
/// Minimum surviving points for a split and a fit to make sense.
pub const MIN_FEATURED_POINTS: usize = 7;

/// Derive `lag_1/3/6`, trailing `rolling_mean_3`/`rolling_std_3`, and
/// calendar fields for each point with complete history.
///
/// Lags are strict lookbacks by position in the (sorted) series: `lag_k` at
/// point `t` is the value at point `t - k`, never anything at or after `t`.
/// The first [`MAX_LAG`] points have incomplete windows and are dropped
/// entirely rather than filled with synthetic values, which would bias every
/// model the same way and silently.
pub fn derive_features(points: &[TimeSeriesPoint]) -> Result<Vec<FeaturedPoint>, AppError> {
    // The aggregator emits sorted output, but the contract is cheap to
    // re-establish here and lag causality depends on it.
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.month);

    let mut out = Vec::with_capacity(sorted.len().saturating_sub(MAX_LAG));
    for i in MAX_LAG..sorted.len() {
        let window: Vec<f64> = sorted[i + 1 - ROLLING_WINDOW..=i]
            .iter()
            .map(|p| p.value)
            .collect();

        let point = &sorted[i];
        out.push(FeaturedPoint {
            month: point.month,
            value: point.value,
            lag_1: sorted[i - 1].value,
            lag_3: sorted[i - 3].value,
            lag_6: sorted[i - 6].value,
            rolling_mean_3: stats::mean(&window),
            rolling_std_3: stats::sample_std(&window),
            month_of_year: point.month.month(),
            year: point.month.year(),
        });
    }

    if out.len() < MIN_FEATURED_POINTS {
        return Err(AppError::insufficient_history(format!(
            "Only {} monthly points remain after lag/rolling derivation \
             ({} observed, first {} dropped); at least {} are required to split and train.",
            out.len(),
            points.len(),
            MAX_LAG.min(points.len()),
            MIN_FEATURED_POINTS
        )));
    }

    Ok(out)
}
