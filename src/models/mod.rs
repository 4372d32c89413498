//! Forecast engines.
//!
//! The pipeline depends on two capability shapes, not on concrete model
//! types, so tests can substitute deterministic stubs:
//!
//! - [`SeasonalForecaster`]: fits the raw monthly series and predicts a
//!   timestamped curve covering the fitted history plus a future horizon
//! - [`RegressionForecaster`]: fits supervised feature rows and predicts
//!   values positionally aligned with its input rows
//!
//! All shipped implementations are deterministic for a fixed seed.

use crate::domain::{FeaturedPoint, ForecastSeries, TimeSeriesPoint};
use crate::error::AppError;

pub mod ensemble;
pub mod seasonal;
mod tree;

/// Number of supervised predictors per row.
pub const N_FEATURES: usize = 5;

/// Names of the supervised predictors, in row order.
pub const FEATURE_NAMES: [&str; N_FEATURES] =
    ["lag_1", "lag_3", "lag_6", "rolling_mean_3", "month"];

/// A fitted seasonal model handle.
pub trait SeasonalModel {
    /// Predict the fitted history plus `horizon_months` beyond the last
    /// training month.
    fn predict(&self, horizon_months: usize) -> ForecastSeries;
}

pub trait SeasonalForecaster {
    type Model: SeasonalModel;

    fn fit(&self, train: &[TimeSeriesPoint]) -> Result<Self::Model, AppError>;
}

/// A fitted regression model handle.
pub trait RegressionModel {
    /// Predictions aligned positionally with `features` (same length/order).
    fn predict(&self, features: &[[f64; N_FEATURES]]) -> Vec<f64>;
}

pub trait RegressionForecaster {
    type Model: RegressionModel;

    fn fit(&self, features: &[[f64; N_FEATURES]], target: &[f64]) -> Result<Self::Model, AppError>;
}

/// Extract the supervised design matrix and target from featured points.
pub fn regression_matrix(points: &[FeaturedPoint]) -> (Vec<[f64; N_FEATURES]>, Vec<f64>) {
    let features = points
        .iter()
        .map(|p| {
            [
                p.lag_1,
                p.lag_3,
                p.lag_6,
                p.rolling_mean_3,
                p.month_of_year as f64,
            ]
        })
        .collect();
    let target = points.iter().map(|p| p.value).collect();
    (features, target)
}
