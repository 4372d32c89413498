//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while the pipeline runs
//! - exported to CSV/JSON artifacts
//! - reloaded later (the column mapping survives between runs)

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Logical field roles, independent of the concrete column names in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Date,
    Sales,
    Category,
    Region,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 4] = [
        ColumnRole::Date,
        ColumnRole::Sales,
        ColumnRole::Category,
        ColumnRole::Region,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnRole::Date => "date",
            ColumnRole::Sales => "sales",
            ColumnRole::Category => "category",
            ColumnRole::Region => "region",
        }
    }

    /// Date and sales are required for any downstream stage to function.
    pub fn is_required(self) -> bool {
        matches!(self, ColumnRole::Date | ColumnRole::Sales)
    }
}

/// Immutable mapping from logical role to concrete column name.
///
/// Produced once by the schema resolver, consumed read-only by every later
/// stage. Serializes to a flat `role -> column` map so re-runs can skip
/// interactive resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub date: String,
    pub sales: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl ColumnMapping {
    pub fn column(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::Date => Some(&self.date),
            ColumnRole::Sales => Some(&self.sales),
            ColumnRole::Category => self.category.as_deref(),
            ColumnRole::Region => self.region.as_deref(),
        }
    }
}

/// One cleaned transactional row.
#[derive(Debug, Clone)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub sales: f64,
    pub category: Option<String>,
    pub region: Option<String>,
}

/// A `SalesRecord` extended with calendar attributes and the monthly
/// aggregate statistics of its (year, month) group.
#[derive(Debug, Clone)]
pub struct FeaturedRecord {
    pub record: SalesRecord,
    pub year: i32,
    pub month: u32,
    pub quarter: u32,
    /// Monday = 0 .. Sunday = 6.
    pub day_of_week: u32,
    pub is_weekend: bool,
    /// November or December.
    pub is_holiday_season: bool,
    pub monthly_mean: f64,
    pub monthly_std: f64,
    pub monthly_count: usize,
}

/// One point of the aggregated monthly series.
///
/// `month` is the first day of the calendar month; `value` is the sum of
/// sales observed in that month. The aggregator produces exactly one point
/// per observed month, sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub month: NaiveDate,
    pub value: f64,
}

/// A `TimeSeriesPoint` extended with the derived predictors every model
/// consumes.
///
/// Lag and rolling fields only ever reference strictly earlier months; the
/// rolling window is trailing and includes the current point.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedPoint {
    pub month: NaiveDate,
    pub value: f64,
    pub lag_1: f64,
    pub lag_3: f64,
    pub lag_6: f64,
    pub rolling_mean_3: f64,
    pub rolling_std_3: f64,
    pub month_of_year: u32,
    pub year: i32,
}

/// Disjoint, order-preserving chronological partition of a featured series.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Vec<FeaturedPoint>,
    pub test: Vec<FeaturedPoint>,
}

/// A single `(month, predicted value)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub month: NaiveDate,
    pub value: f64,
}

/// Sequence of forecast points covering both the fitted historical range and
/// a future horizon beyond the last training month.
#[derive(Debug, Clone, Default)]
pub struct ForecastSeries {
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Points strictly after `last_actual` (the exportable future horizon).
    pub fn future_after(&self, last_actual: NaiveDate) -> Vec<ForecastPoint> {
        self.points
            .iter()
            .filter(|p| p.month > last_actual)
            .cloned()
            .collect()
    }
}

/// Error metrics over aligned (actual, predicted) pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub n_aligned: usize,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Input CSV. `None` runs on the synthetic sample dataset.
    pub input: Option<PathBuf>,
    pub out_dir: PathBuf,

    pub test_fraction: f64,
    /// Months to forecast beyond the last observed month.
    pub horizon_months: usize,

    /// Seed for the random forest and the sample generator.
    pub seed: u64,
    pub n_trees: usize,
    pub max_depth: usize,
    pub learning_rate: f64,

    /// Months of synthetic history when the sample dataset is used.
    pub sample_months: usize,
    /// Fail instead of falling back to sample data on low suitability.
    pub no_sample_fallback: bool,

    pub charts: bool,
}
