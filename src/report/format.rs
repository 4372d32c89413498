//! Formatted output for the terminal and the business report file.
//!
//! Formatting code lives in one place so:
//! - the pipeline stays clean and testable
//! - output changes are localized

use chrono::Datelike;

use crate::app::pipeline::{ModelRun, RunOutput};
use crate::domain::{ColumnRole, RunConfig};
use crate::validate::{MIN_DATE_RANGE_DAYS, MIN_RECORDS};

/// Format the full run summary: data source, mapping, assessment, cleaning,
/// series shape, and per-model evaluation.
pub fn format_run_summary(config: &RunConfig, output: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== salescast - Retail Sales Forecast ===\n");
    match (&config.input, output.used_sample) {
        (Some(path), false) => out.push_str(&format!("Input: {}\n", path.display())),
        (Some(path), true) => out.push_str(&format!(
            "Input: {} (failed assessment; using sample dataset)\n",
            path.display()
        )),
        (None, _) => out.push_str(&format!(
            "Input: sample dataset ({} months, seed {})\n",
            config.sample_months, config.seed
        )),
    }

    out.push_str("\nColumn mapping:\n");
    for role in ColumnRole::ALL {
        match output.mapping.column(role) {
            Some(column) => out.push_str(&format!("  {:<8} -> {column}\n", role.as_str())),
            None => out.push_str(&format!("  {:<8} -> (not mapped)\n", role.as_str())),
        }
    }

    if let Some(suitability) = &output.suitability {
        out.push_str("\nSuitability assessment:\n");
        out.push_str(&format!(
            "  [{}] date column resolved\n",
            check(suitability.has_date_column)
        ));
        out.push_str(&format!(
            "  [{}] sales column resolved\n",
            check(suitability.has_sales_column)
        ));
        out.push_str(&format!(
            "  [{}] records: {} (minimum {MIN_RECORDS})\n",
            check(suitability.sufficient_records),
            suitability.n_records
        ));
        out.push_str(&format!(
            "  [{}] date range: {} days (minimum {MIN_DATE_RANGE_DAYS})\n",
            check(suitability.sufficient_date_range),
            suitability.date_range_days
        ));
        out.push_str(&format!("  Score: {:.0}/100\n", suitability.score));
    }

    if let Some(clean) = &output.clean {
        out.push_str("\nCleaning:\n");
        out.push_str(&format!(
            "  rows {} -> {} | invalid dates: {} | imputed sales: {} | imputed labels: {} \
             | outliers removed: {}\n",
            clean.rows_in,
            clean.rows_out,
            clean.invalid_dates,
            clean.imputed_sales,
            clean.imputed_labels,
            clean.outliers_removed
        ));
    }

    out.push_str(&format!(
        "\nSeries: {} months | featured: {} | train/test: {}/{}\n",
        output.series.len(),
        output.n_featured_points,
        output.train_len,
        output.test_len
    ));

    out.push_str("\nModel evaluation (hold-out):\n");
    out.push_str(&format_model_table(&output.models));

    out
}

/// Format the per-model metric table, flagging the best MAE with `*`.
pub fn format_model_table(models: &[ModelRun]) -> String {
    let mut out = String::new();
    let best = best_model(models).map(|m| m.name);

    for model in models {
        let chosen = if best == Some(model.name) { "*" } else { " " };
        match (&model.metrics, &model.failure) {
            (Some(metrics), _) => out.push_str(&format!(
                "{chosen} {:<22} MAE={:>10.2}  RMSE={:>10.2}  (n={})\n",
                model.name, metrics.mae, metrics.rmse, metrics.n_aligned
            )),
            (None, Some(failure)) => {
                out.push_str(&format!("  {:<22} failed: {failure}\n", model.name));
            }
            (None, None) => out.push_str(&format!("  {:<22} no result\n", model.name)),
        }
    }
    out
}

/// The evaluated model with the lowest MAE, if any produced metrics.
pub fn best_model(models: &[ModelRun]) -> Option<&ModelRun> {
    models
        .iter()
        .filter(|m| m.metrics.is_some())
        .min_by(|a, b| {
            let (Some(ma), Some(mb)) = (&a.metrics, &b.metrics) else {
                return std::cmp::Ordering::Equal;
            };
            ma.mae
                .partial_cmp(&mb.mae)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Format the written business report: headline figures, model accuracy,
/// and plain-language recommendations.
pub fn format_business_report(config: &RunConfig, output: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("SALES FORECAST REPORT\n");
    out.push_str("=====================\n\n");

    let total: f64 = output.series.iter().map(|p| p.value).sum();
    let monthly_average = if output.series.is_empty() {
        0.0
    } else {
        total / output.series.len() as f64
    };
    out.push_str("Headline figures\n");
    out.push_str(&format!("- Months of history: {}\n", output.series.len()));
    out.push_str(&format!("- Total sales: {total:.2}\n"));
    out.push_str(&format!("- Average monthly sales: {monthly_average:.2}\n"));
    if let Some(peak) = output
        .series
        .iter()
        .max_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal))
    {
        out.push_str(&format!(
            "- Peak month: {} ({:.2})\n",
            peak.month.format("%Y-%m"),
            peak.value
        ));
    }
    out.push_str(&format!(
        "- Weekend transactions: {:.1}% | holiday-season transactions: {:.1}%\n",
        output.record_stats.weekend_share * 100.0,
        output.record_stats.holiday_share * 100.0
    ));

    out.push_str("\nModel accuracy (hold-out)\n");
    out.push_str(&format_model_table(&output.models));

    out.push_str("\nForecast\n");
    match (output.future.first(), output.future.last()) {
        (Some(first), Some(last)) => {
            let future_total: f64 = output.future.iter().map(|p| p.value).sum();
            out.push_str(&format!(
                "- Horizon: {} months ({} .. {})\n",
                output.future.len(),
                first.month.format("%Y-%m"),
                last.month.format("%Y-%m")
            ));
            out.push_str(&format!("- Projected total over horizon: {future_total:.2}\n"));
        }
        _ => out.push_str("- No future forecast available for this run.\n"),
    }

    out.push_str("\nRecommendations\n");
    if let Some(best) = best_model(&output.models) {
        out.push_str(&format!(
            "- Base planning on the {} forecast; it had the lowest hold-out MAE.\n",
            best.name
        ));
    } else {
        out.push_str("- No model produced usable metrics; treat the forecast as indicative only.\n");
    }
    if output.record_stats.holiday_share > 0.15 {
        out.push_str(
            "- A large share of sales lands in November/December; plan inventory ahead of Q4.\n",
        );
    }
    if output.used_sample {
        out.push_str(&format!(
            "- This run used the synthetic sample dataset; provide at least {MIN_RECORDS} \
             records spanning {MIN_DATE_RANGE_DAYS}+ days for a real forecast.\n",
        ));
    }
    if let Some(first) = output.series.first() {
        if let Some(last) = output.series.last() {
            if last.value > first.value && output.series.len() >= 12 {
                out.push_str(&format!(
                    "- Sales grew from {:.2} ({}) to {:.2} ({}); the trend models reflect \
                     continued growth.\n",
                    first.value,
                    first.month.year(),
                    last.value,
                    last.month.year()
                ));
            }
        }
    }

    out.push_str(&format!(
        "\nArtifacts written to {}\n",
        config.out_dir.display()
    ));

    out
}

fn check(ok: bool) -> &'static str {
    if ok { "x" } else { " " }
}
