//! PNG chart rendering.
//!
//! Charts are drawn with the bitmap backend only, without text elements, so
//! the crate needs no font machinery. The forecast chart shows the actual
//! monthly series and the future forecast as two line series; the comparison
//! chart shows per-model MAE as bars. Downstream docs/readers get the
//! numbers from the report; the charts are for shape at a glance.

use std::path::Path;

use plotters::prelude::*;

use crate::app::pipeline::ModelRun;
use crate::domain::{ForecastPoint, TimeSeriesPoint};
use crate::error::AppError;

const CHART_SIZE: (u32, u32) = (900, 500);

const ACTUAL_COLOR: RGBColor = RGBColor(30, 90, 200);
const FORECAST_COLOR: RGBColor = RGBColor(210, 80, 40);

/// Render the actual series plus the future forecast to a PNG.
pub fn render_forecast_chart(
    path: &Path,
    actual: &[TimeSeriesPoint],
    future: &[ForecastPoint],
) -> Result<(), AppError> {
    if actual.is_empty() {
        return Err(AppError::insufficient_data(
            "Nothing to chart: the actual series is empty.",
        ));
    }

    // Months on a shared index axis: actuals first, then the future.
    let actual_xy: Vec<(f64, f64)> = actual
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect();
    let mut forecast_xy: Vec<(f64, f64)> = Vec::with_capacity(future.len() + 1);
    // Anchor the forecast line at the last actual point for continuity.
    if let Some(&(x, y)) = actual_xy.last() {
        forecast_xy.push((x, y));
    }
    forecast_xy.extend(
        future
            .iter()
            .enumerate()
            .map(|(i, p)| ((actual.len() + i) as f64, p.value)),
    );

    let x_max = (actual.len() + future.len()).saturating_sub(1).max(1) as f64;
    let y_max = actual_xy
        .iter()
        .chain(&forecast_xy)
        .map(|&(_, y)| y)
        .fold(f64::MIN, f64::max)
        .max(1.0);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| chart_error(path, &e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max * 1.05)
        .map_err(|e| chart_error(path, &e.to_string()))?;

    chart
        .draw_series(LineSeries::new(
            actual_xy.iter().copied(),
            ACTUAL_COLOR.stroke_width(2),
        ))
        .map_err(|e| chart_error(path, &e.to_string()))?;
    chart
        .draw_series(LineSeries::new(
            forecast_xy.iter().copied(),
            FORECAST_COLOR.stroke_width(2),
        ))
        .map_err(|e| chart_error(path, &e.to_string()))?;

    root.present()
        .map_err(|e| chart_error(path, &e.to_string()))?;
    Ok(())
}

/// Render per-model MAE bars to a PNG. Models without metrics are skipped.
pub fn render_comparison_chart(path: &Path, models: &[ModelRun]) -> Result<(), AppError> {
    let maes: Vec<(&str, f64)> = models
        .iter()
        .filter_map(|m| m.metrics.as_ref().map(|metrics| (m.name, metrics.mae)))
        .collect();
    if maes.is_empty() {
        return Err(AppError::insufficient_data(
            "Nothing to chart: no model produced metrics.",
        ));
    }

    let y_max = maes
        .iter()
        .map(|&(_, mae)| mae)
        .fold(f64::MIN, f64::max)
        .max(1.0);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| chart_error(path, &e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0.0..maes.len() as f64, 0.0..y_max * 1.1)
        .map_err(|e| chart_error(path, &e.to_string()))?;

    chart
        .draw_series(maes.iter().enumerate().map(|(i, &(_, mae))| {
            Rectangle::new(
                [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, mae)],
                ACTUAL_COLOR.mix(0.8).filled(),
            )
        }))
        .map_err(|e| chart_error(path, &e.to_string()))?;

    root.present()
        .map_err(|e| chart_error(path, &e.to_string()))?;
    Ok(())
}

fn chart_error(path: &Path, detail: &str) -> AppError {
    AppError::io(format!("Failed to render chart '{}': {detail}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EvaluationMetrics;
    use crate::series::aggregate::{month_start, months_after};
    use chrono::NaiveDate;
    use std::fs;

    fn series(n: usize) -> Vec<TimeSeriesPoint> {
        let start = month_start(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        (0..n)
            .map(|i| TimeSeriesPoint {
                month: months_after(start, i as u32),
                value: 100.0 + 5.0 * i as f64,
            })
            .collect()
    }

    #[test]
    fn forecast_chart_writes_a_png() {
        let dir = std::env::temp_dir().join("salescast-plot-forecast");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("forecast.png");

        let actual = series(12);
        let future: Vec<ForecastPoint> = (0..6)
            .map(|i| ForecastPoint {
                month: months_after(actual[11].month, i as u32 + 1),
                value: 160.0 + 5.0 * i as f64,
            })
            .collect();

        render_forecast_chart(&path, &actual, &future).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn comparison_chart_writes_a_png() {
        let dir = std::env::temp_dir().join("salescast-plot-comparison");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("comparison.png");

        let models = vec![
            ModelRun {
                name: "Seasonal decomposition",
                metrics: Some(EvaluationMetrics { mae: 40.0, rmse: 45.0, n_aligned: 6 }),
                failure: None,
            },
            ModelRun {
                name: "Gradient boosting",
                metrics: Some(EvaluationMetrics { mae: 25.0, rmse: 30.0, n_aligned: 6 }),
                failure: None,
            },
        ];

        render_comparison_chart(&path, &models).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let path = std::env::temp_dir().join("salescast-plot-empty.png");
        let err = render_forecast_chart(&path, &[], &[]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InsufficientData);
        let err = render_comparison_chart(&path, &[]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InsufficientData);
    }
}
