//! The forecasting pipeline shared by the CLI front-end.
//!
//! Stages run strictly in order:
//! acquire -> validate -> clean -> feature -> aggregate -> derive ->
//! split -> fit/evaluate per model.
//!
//! Model fitting failures are caught per model (recorded on the
//! [`ModelRun`], the run continues); every failure before the split is
//! fatal, except low suitability, which falls back to the synthetic sample
//! dataset unless the run forbids it.

use std::path::Path;

use crate::clean::{self, CleanReport};
use crate::data::sample;
use crate::domain::{
    ColumnMapping, EvaluationMetrics, FeaturedPoint, ForecastPoint, RunConfig, SalesRecord,
    TimeSeriesPoint,
};
use crate::error::AppError;
use crate::eval;
use crate::features;
use crate::io::export::CategoryMonth;
use crate::io::{ingest, mapping as mapping_io};
use crate::models::ensemble::{GradientBoost, RandomForest};
use crate::models::seasonal::SeasonalDecomposition;
use crate::models::{RegressionForecaster, RegressionModel, SeasonalForecaster, SeasonalModel};
use crate::schema::{self, MappingFallback};
use crate::series::aggregate::{aggregate_monthly, month_start};
use crate::series::features::derive_features;
use crate::series::split::chronological_split;
use crate::validate::{self, SuitabilityReport};

pub const MAPPING_FILE: &str = "column_mapping.json";

pub const SEASONAL_NAME: &str = "Seasonal decomposition";
pub const BOOST_NAME: &str = "Gradient boosting";
pub const FOREST_NAME: &str = "Random forest";

/// One model's evaluation outcome. Exactly one of `metrics`/`failure` is set.
#[derive(Debug, Clone)]
pub struct ModelRun {
    pub name: &'static str,
    pub metrics: Option<EvaluationMetrics>,
    pub failure: Option<String>,
}

impl ModelRun {
    fn ok(name: &'static str, metrics: EvaluationMetrics) -> Self {
        ModelRun {
            name,
            metrics: Some(metrics),
            failure: None,
        }
    }

    fn failed(name: &'static str, err: AppError) -> Self {
        ModelRun {
            name,
            metrics: None,
            failure: Some(err.to_string()),
        }
    }
}

/// Transaction-level facts surfaced in the business report.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordStats {
    pub n_records: usize,
    /// Share of transactions dated on a Saturday or Sunday.
    pub weekend_share: f64,
    /// Share of transactions dated in November or December.
    pub holiday_share: f64,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub mapping: ColumnMapping,
    /// True when the synthetic sample dataset was used (no input, or
    /// fallback after a failed suitability assessment).
    pub used_sample: bool,
    /// Assessment of the provided input file, when there was one.
    pub suitability: Option<SuitabilityReport>,
    /// Cleaning accounting for the provided input file, when one was used.
    pub clean: Option<CleanReport>,
    pub record_stats: RecordStats,

    pub series: Vec<TimeSeriesPoint>,
    pub n_featured_points: usize,
    pub train_len: usize,
    pub test_len: usize,

    pub models: Vec<ModelRun>,
    /// Forecast months strictly after the last observed month.
    pub future: Vec<ForecastPoint>,
    pub categories: Vec<CategoryMonth>,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run(config: &RunConfig, fallback: &dyn MappingFallback) -> Result<RunOutput, AppError> {
    let acquired = acquire(config, fallback)?;

    let featured_records = features::build(&acquired.records);
    let record_stats = record_stats(&featured_records);
    let categories = category_totals(&acquired.records);

    let series = aggregate_monthly(&acquired.records);
    let featured = derive_features(&series)?;
    let split = chronological_split(&featured, config.test_fraction)?;

    let train_series: Vec<TimeSeriesPoint> = split
        .train
        .iter()
        .map(|p| TimeSeriesPoint {
            month: p.month,
            value: p.value,
        })
        .collect();
    let last_actual = match series.last() {
        Some(point) => point.month,
        None => {
            return Err(AppError::insufficient_data(
                "Monthly aggregation produced an empty series.",
            ));
        }
    };

    let (seasonal_run, future) = evaluate_seasonal(
        &SeasonalDecomposition,
        &train_series,
        &split.test,
        config.horizon_months,
        last_actual,
    );

    let boost = GradientBoost {
        n_trees: config.n_trees,
        learning_rate: config.learning_rate,
        max_depth: config.max_depth,
    };
    let forest = RandomForest {
        n_trees: config.n_trees,
        max_depth: config.max_depth,
        seed: config.seed,
    };
    let boost_run = evaluate_regression(BOOST_NAME, &boost, &split.train, &split.test);
    let forest_run = evaluate_regression(FOREST_NAME, &forest, &split.train, &split.test);

    Ok(RunOutput {
        mapping: acquired.mapping,
        used_sample: acquired.used_sample,
        suitability: acquired.suitability,
        clean: acquired.clean,
        record_stats,
        series,
        n_featured_points: featured.len(),
        train_len: split.train.len(),
        test_len: split.test.len(),
        models: vec![seasonal_run, boost_run, forest_run],
        future,
        categories,
    })
}

struct Acquired {
    records: Vec<SalesRecord>,
    mapping: ColumnMapping,
    used_sample: bool,
    suitability: Option<SuitabilityReport>,
    clean: Option<CleanReport>,
}

/// Produce typed records: from the input file when it passes assessment,
/// from the synthetic sample generator otherwise.
fn acquire(config: &RunConfig, fallback: &dyn MappingFallback) -> Result<Acquired, AppError> {
    let Some(input) = &config.input else {
        return sample_acquired(config, None);
    };

    let ingested = ingest::load_csv(input)?;
    let table = &ingested.table;
    let mapping = resolve_mapping(table, &config.out_dir, fallback)?;
    let suitability = validate::assess(table, &mapping)?;

    if !suitability.is_usable() {
        if config.no_sample_fallback {
            return Err(AppError::insufficient_data(format!(
                "Dataset '{}' scored {:.0}/100 on suitability (minimum {:.0}) and the \
                 sample fallback is disabled.",
                input.display(),
                suitability.score,
                validate::MIN_SUITABILITY_SCORE
            )));
        }
        return sample_acquired(config, Some(suitability));
    }

    let cleaned = clean::clean(table, &mapping)?;
    Ok(Acquired {
        records: cleaned.records,
        mapping,
        used_sample: false,
        suitability: Some(suitability),
        clean: Some(cleaned.report),
    })
}

fn sample_acquired(
    config: &RunConfig,
    suitability: Option<SuitabilityReport>,
) -> Result<Acquired, AppError> {
    let records = sample::generate(config.sample_months, config.seed)?;
    Ok(Acquired {
        records,
        mapping: sample_mapping(),
        used_sample: true,
        suitability,
        clean: None,
    })
}

/// The implicit mapping of the synthetic sample dataset.
fn sample_mapping() -> ColumnMapping {
    ColumnMapping {
        date: "date".to_string(),
        sales: "sales".to_string(),
        category: Some("category".to_string()),
        region: Some("region".to_string()),
    }
}

/// Reuse the persisted mapping when every mapped column still exists in the
/// table; otherwise resolve afresh and persist the result.
fn resolve_mapping(
    table: &ingest::RawTable,
    out_dir: &Path,
    fallback: &dyn MappingFallback,
) -> Result<ColumnMapping, AppError> {
    let path = out_dir.join(MAPPING_FILE);

    if let Some(persisted) = mapping_io::read_mapping(&path)? {
        if mapping_fits(&persisted, table) {
            return Ok(persisted);
        }
    }

    let mapping = schema::resolve_with(&table.headers, fallback)?;
    std::fs::create_dir_all(out_dir).map_err(|e| {
        AppError::io(format!(
            "Failed to create output directory '{}': {e}",
            out_dir.display()
        ))
    })?;
    mapping_io::write_mapping(&path, &mapping)?;
    Ok(mapping)
}

fn mapping_fits(mapping: &ColumnMapping, table: &ingest::RawTable) -> bool {
    let present = |name: &str| table.column_index(name).is_some();
    present(&mapping.date)
        && present(&mapping.sales)
        && mapping.category.as_deref().is_none_or(&present)
        && mapping.region.as_deref().is_none_or(&present)
}

fn record_stats(featured: &[crate::domain::FeaturedRecord]) -> RecordStats {
    let n = featured.len();
    if n == 0 {
        return RecordStats::default();
    }
    let weekend = featured.iter().filter(|r| r.is_weekend).count();
    let holiday = featured.iter().filter(|r| r.is_holiday_season).count();
    RecordStats {
        n_records: n,
        weekend_share: weekend as f64 / n as f64,
        holiday_share: holiday as f64 / n as f64,
    }
}

/// Monthly sales totals per category, sorted by (month, category). Empty
/// when no record carries a category label.
fn category_totals(records: &[SalesRecord]) -> Vec<CategoryMonth> {
    let mut totals = std::collections::BTreeMap::new();
    for record in records {
        let Some(category) = &record.category else {
            continue;
        };
        *totals
            .entry((month_start(record.date), category.clone()))
            .or_insert(0.0) += record.sales;
    }
    totals
        .into_iter()
        .map(|((month, category), sales)| CategoryMonth {
            month,
            category,
            sales,
        })
        .collect()
}

/// Fit the seasonal model on the train series and evaluate it against the
/// test months by month join. Returns the run plus the future forecast
/// (empty if the model failed).
fn evaluate_seasonal<F: SeasonalForecaster>(
    forecaster: &F,
    train: &[TimeSeriesPoint],
    test: &[FeaturedPoint],
    horizon_months: usize,
    last_actual: chrono::NaiveDate,
) -> (ModelRun, Vec<ForecastPoint>) {
    let model = match forecaster.fit(train) {
        Ok(model) => model,
        Err(err) => return (ModelRun::failed(SEASONAL_NAME, err), Vec::new()),
    };

    // Cover the test months plus the requested future horizon.
    let forecast = model.predict(test.len() + horizon_months);
    let future = forecast.future_after(last_actual);

    let run = eval::align_by_month(test, &forecast)
        .and_then(|pairs| eval::metrics(&pairs))
        .map_or_else(
            |err| ModelRun::failed(SEASONAL_NAME, err),
            |metrics| ModelRun::ok(SEASONAL_NAME, metrics),
        );
    (run, future)
}

/// Fit a supervised regressor on the train rows and evaluate its positional
/// predictions on the test rows.
fn evaluate_regression<F: RegressionForecaster>(
    name: &'static str,
    forecaster: &F,
    train: &[FeaturedPoint],
    test: &[FeaturedPoint],
) -> ModelRun {
    let (train_features, train_target) = crate::models::regression_matrix(train);
    let (test_features, test_target) = crate::models::regression_matrix(test);

    let model = match forecaster.fit(&train_features, &train_target) {
        Ok(model) => model,
        Err(err) => return ModelRun::failed(name, err),
    };

    let predicted = model.predict(&test_features);
    eval::align_by_position(&test_target, &predicted)
        .and_then(|pairs| eval::metrics(&pairs))
        .map_or_else(|err| ModelRun::failed(name, err), |metrics| ModelRun::ok(name, metrics))
}
