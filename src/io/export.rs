//! Export run artifacts to CSV.
//!
//! Two files are written per run: the combined actual/forecast series and a
//! per-category monthly breakdown. Both are plain CSV, easy to consume in
//! spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{ForecastPoint, TimeSeriesPoint};
use crate::error::AppError;

/// One month of sales attributed to a category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMonth {
    pub month: NaiveDate,
    pub category: String,
    pub sales: f64,
}

/// Write the combined series: every actual month labeled `Actual`, followed
/// by the future forecast months labeled `Forecast`.
pub fn write_forecast_csv(
    path: &Path,
    actual: &[TimeSeriesPoint],
    future: &[ForecastPoint],
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::io(format!("Failed to create forecast CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "timestamp,value,label")
        .map_err(|e| AppError::io(format!("Failed to write forecast CSV header: {e}")))?;

    for point in actual {
        writeln!(file, "{},{:.2},Actual", point.month, point.value)
            .map_err(|e| AppError::io(format!("Failed to write forecast CSV row: {e}")))?;
    }
    for point in future {
        writeln!(file, "{},{:.2},Forecast", point.month, point.value)
            .map_err(|e| AppError::io(format!("Failed to write forecast CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the per-category monthly totals.
pub fn write_category_csv(path: &Path, rows: &[CategoryMonth]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::io(format!("Failed to create category CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "month,category,sales")
        .map_err(|e| AppError::io(format!("Failed to write category CSV header: {e}")))?;

    for row in rows {
        writeln!(
            file,
            "{},{},{:.2}",
            row.month,
            csv_escape(&row.category),
            row.sales
        )
        .map_err(|e| AppError::io(format!("Failed to write category CSV row: {e}")))?;
    }

    Ok(())
}

/// Quote a field if it contains a comma or quote.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::aggregate::month_start;
    use std::fs;

    fn month(y: i32, m: u32) -> NaiveDate {
        month_start(NaiveDate::from_ymd_opt(y, m, 1).unwrap())
    }

    #[test]
    fn forecast_csv_labels_actual_then_forecast() {
        let dir = std::env::temp_dir().join("salescast-test-forecast-csv");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("forecast_data.csv");

        let actual = vec![
            TimeSeriesPoint { month: month(2024, 1), value: 100.0 },
            TimeSeriesPoint { month: month(2024, 2), value: 110.0 },
        ];
        let future = vec![ForecastPoint { month: month(2024, 3), value: 120.5 }];

        write_forecast_csv(&path, &actual, &future).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "timestamp,value,label");
        assert_eq!(lines[1], "2024-01-01,100.00,Actual");
        assert_eq!(lines[3], "2024-03-01,120.50,Forecast");
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn category_csv_quotes_awkward_names() {
        let dir = std::env::temp_dir().join("salescast-test-category-csv");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("category_data.csv");

        let rows = vec![CategoryMonth {
            month: month(2024, 1),
            category: "Desks, Chairs".to_string(),
            sales: 42.0,
        }];
        write_category_csv(&path, &rows).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        assert!(body.contains("2024-01-01,\"Desks, Chairs\",42.00"));
        fs::remove_dir_all(&dir).ok();
    }
}
