//! Additive seasonal decomposition forecaster.
//!
//! The model is a linear trend over month index (least squares via
//! [`crate::math::trend`]) plus twelve additive seasonal indices taken from
//! the mean detrended residual of each calendar month. Simple, fully
//! deterministic, and honest about yearly seasonality on series this short.

use chrono::Datelike;

use crate::domain::{ForecastPoint, ForecastSeries, TimeSeriesPoint};
use crate::error::AppError;
use crate::math::trend;
use crate::models::{SeasonalForecaster, SeasonalModel};
use crate::series::aggregate::months_after;

/// Minimum training points for the trend fit to be determined.
const MIN_TRAIN_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalDecomposition;

#[derive(Debug, Clone)]
pub struct SeasonalDecompositionModel {
    intercept: f64,
    slope: f64,
    /// Additive index per calendar month (index 0 = January). Months unseen
    /// in training keep a zero index.
    seasonal: [f64; 12],
    first_month: chrono::NaiveDate,
    n_train: usize,
}

impl SeasonalForecaster for SeasonalDecomposition {
    type Model = SeasonalDecompositionModel;

    fn fit(&self, train: &[TimeSeriesPoint]) -> Result<Self::Model, AppError> {
        if train.len() < MIN_TRAIN_POINTS {
            return Err(AppError::model(format!(
                "Seasonal decomposition needs at least {MIN_TRAIN_POINTS} training points, got {}.",
                train.len()
            )));
        }

        let mut sorted = train.to_vec();
        sorted.sort_by_key(|p| p.month);

        let xs: Vec<f64> = (0..sorted.len()).map(|i| i as f64).collect();
        let ys: Vec<f64> = sorted.iter().map(|p| p.value).collect();
        let (intercept, slope) = trend::fit_line(&xs, &ys).ok_or_else(|| {
            AppError::model("Trend fit failed: degenerate training series.")
        })?;

        // Mean detrended residual per calendar month.
        let mut residual_sum = [0.0f64; 12];
        let mut residual_count = [0usize; 12];
        for (i, point) in sorted.iter().enumerate() {
            let residual = point.value - (intercept + slope * i as f64);
            let m = point.month.month0() as usize;
            residual_sum[m] += residual;
            residual_count[m] += 1;
        }

        let mut seasonal = [0.0f64; 12];
        for m in 0..12 {
            if residual_count[m] > 0 {
                seasonal[m] = residual_sum[m] / residual_count[m] as f64;
            }
        }

        Ok(SeasonalDecompositionModel {
            intercept,
            slope,
            seasonal,
            first_month: sorted[0].month,
            n_train: sorted.len(),
        })
    }
}

impl SeasonalModel for SeasonalDecompositionModel {
    fn predict(&self, horizon_months: usize) -> ForecastSeries {
        let points = (0..self.n_train + horizon_months)
            .map(|i| {
                let month = months_after(self.first_month, i as u32);
                let trend = self.intercept + self.slope * i as f64;
                let value = trend + self.seasonal[month.month0() as usize];
                ForecastPoint { month, value }
            })
            .collect();
        ForecastSeries { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::aggregate::month_start;
    use chrono::NaiveDate;

    fn monthly(values: &[f64]) -> Vec<TimeSeriesPoint> {
        let start = month_start(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| TimeSeriesPoint {
                month: months_after(start, i as u32),
                value,
            })
            .collect()
    }

    #[test]
    fn recovers_a_pure_linear_trend() {
        let train = monthly(&(0..24).map(|i| 100.0 + 5.0 * i as f64).collect::<Vec<_>>());
        let model = SeasonalDecomposition.fit(&train).unwrap();
        let forecast = model.predict(6);

        assert_eq!(forecast.points.len(), 30);
        // In-sample months reproduce the line; future months extend it.
        assert!((forecast.points[0].value - 100.0).abs() < 1e-6);
        assert!((forecast.points[29].value - (100.0 + 5.0 * 29.0)).abs() < 1e-6);
    }

    #[test]
    fn learns_additive_seasonal_bumps() {
        // Flat base of 100 with +50 every December, over two full years.
        let values: Vec<f64> = (0..24)
            .map(|i| if i % 12 == 11 { 150.0 } else { 100.0 })
            .collect();
        let train = monthly(&values);
        let model = SeasonalDecomposition.fit(&train).unwrap();
        let forecast = model.predict(12);

        // The forecast for the next December sits well above the next June.
        let december = forecast
            .points
            .iter()
            .find(|p| p.month == NaiveDate::from_ymd_opt(2024, 12, 1).unwrap())
            .unwrap();
        let june = forecast
            .points
            .iter()
            .find(|p| p.month == NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .unwrap();
        assert!(december.value - june.value > 30.0);
    }

    #[test]
    fn forecast_covers_history_and_horizon() {
        let train = monthly(&(0..12).map(|i| 10.0 + i as f64).collect::<Vec<_>>());
        let model = SeasonalDecomposition.fit(&train).unwrap();
        let forecast = model.predict(3);

        assert_eq!(forecast.points.first().unwrap().month, train[0].month);
        assert_eq!(
            forecast.points.last().unwrap().month,
            months_after(train[11].month, 3)
        );
    }

    #[test]
    fn rejects_tiny_training_sets() {
        let err = SeasonalDecomposition.fit(&monthly(&[1.0])).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Model);
    }
}
