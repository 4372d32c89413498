//! Hold-out evaluation: forecast/actual alignment and error metrics.
//!
//! Seasonal forecasts are aligned to the test slice by month (an inner join,
//! so missing months shrink the overlap rather than fabricate pairs).
//! Regression predictions are already positionally aligned with the rows
//! they were predicted from, so they only need a length check.

use std::collections::BTreeMap;

use crate::domain::{EvaluationMetrics, FeaturedPoint, ForecastSeries};
use crate::error::AppError;

/// Inner-join the test months with a timestamped forecast, returning
/// `(actual, predicted)` pairs in month order.
pub fn align_by_month(
    test: &[FeaturedPoint],
    forecast: &ForecastSeries,
) -> Result<Vec<(f64, f64)>, AppError> {
    let predicted: BTreeMap<_, _> = forecast.points.iter().map(|p| (p.month, p.value)).collect();

    let mut sorted: Vec<&FeaturedPoint> = test.iter().collect();
    sorted.sort_by_key(|p| p.month);

    let pairs: Vec<(f64, f64)> = sorted
        .iter()
        .filter_map(|p| predicted.get(&p.month).map(|&value| (p.value, value)))
        .collect();

    if pairs.is_empty() {
        let test_range = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) => format!("{}..{}", first.month, last.month),
            _ => "empty".to_string(),
        };
        let forecast_range = match (forecast.points.first(), forecast.points.last()) {
            (Some(first), Some(last)) => format!("{}..{}", first.month, last.month),
            _ => "empty".to_string(),
        };
        return Err(AppError::empty_alignment(format!(
            "No overlap between test months ({test_range}) and forecast months \
             ({forecast_range})."
        )));
    }
    Ok(pairs)
}

/// Pair actuals with positionally aligned predictions.
pub fn align_by_position(actual: &[f64], predicted: &[f64]) -> Result<Vec<(f64, f64)>, AppError> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return Err(AppError::empty_alignment(format!(
            "Positional alignment needs equal non-empty slices, got {} actuals and \
             {} predictions.",
            actual.len(),
            predicted.len()
        )));
    }
    Ok(actual.iter().copied().zip(predicted.iter().copied()).collect())
}

/// MAE and RMSE over aligned `(actual, predicted)` pairs.
pub fn metrics(pairs: &[(f64, f64)]) -> Result<EvaluationMetrics, AppError> {
    if pairs.is_empty() {
        return Err(AppError::empty_alignment(
            "Cannot compute error metrics over zero aligned pairs.",
        ));
    }
    let n = pairs.len() as f64;
    let mae = pairs.iter().map(|(a, p)| (a - p).abs()).sum::<f64>() / n;
    let rmse = (pairs.iter().map(|(a, p)| (a - p) * (a - p)).sum::<f64>() / n).sqrt();
    Ok(EvaluationMetrics {
        mae,
        rmse,
        n_aligned: pairs.len(),
    })
}
