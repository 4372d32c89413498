//! Cleaning: typed records out of a raw string table.
//!
//! Each step is a pure transform over an immutable input; the stage produces
//! a new record vector plus a [`CleanReport`] describing what it did. Policy,
//! in order:
//!
//! - dates parsed from a small set of common formats; rows whose date does
//!   not parse are dropped (and counted)
//! - missing/unparseable sales imputed with the column median
//! - missing category/region labels imputed with `"Unknown"` when the column
//!   is mapped at all
//! - sales outliers removed by the 1.5 IQR fence

use chrono::NaiveDate;

use crate::domain::{ColumnMapping, SalesRecord};
use crate::error::AppError;
use crate::io::ingest::RawTable;
use crate::math::stats;

const LABEL_FILL: &str = "Unknown";

/// Accounting for one cleaning pass.
#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub invalid_dates: usize,
    pub imputed_sales: usize,
    pub imputed_labels: usize,
    pub outliers_removed: usize,
}

/// Cleaning output: typed records plus the report.
#[derive(Debug, Clone)]
pub struct CleanedData {
    pub records: Vec<SalesRecord>,
    pub report: CleanReport,
}

/// Clean a raw table into typed sales records.
///
/// Fails with a schema error when the mapped date or sales column is absent
/// from the table, or when no rows survive cleaning.
pub fn clean(table: &RawTable, mapping: &ColumnMapping) -> Result<CleanedData, AppError> {
    let date_idx = table.column_index(&mapping.date).ok_or_else(|| {
        AppError::schema(format!(
            "Mapped date column '{}' is not present in the table (columns: {})",
            mapping.date,
            table.headers.join(", ")
        ))
    })?;
    let sales_idx = table.column_index(&mapping.sales).ok_or_else(|| {
        AppError::schema(format!(
            "Mapped sales column '{}' is not present in the table (columns: {})",
            mapping.sales,
            table.headers.join(", ")
        ))
    })?;
    let category_idx = mapping
        .category
        .as_deref()
        .and_then(|c| table.column_index(c));
    let region_idx = mapping.region.as_deref().and_then(|c| table.column_index(c));

    let mut report = CleanReport {
        rows_in: table.rows.len(),
        ..CleanReport::default()
    };

    // First pass: parse cells. Sales stay optional here so the median is
    // computed over observed values only.
    let mut parsed: Vec<(NaiveDate, Option<f64>, Option<String>, Option<String>)> = Vec::new();
    let mut observed_sales = Vec::new();

    for row in &table.rows {
        let Some(date) = row.get(date_idx).and_then(|c| parse_date(c)) else {
            report.invalid_dates += 1;
            continue;
        };

        let sales = row.get(sales_idx).and_then(|c| parse_number(c));
        if let Some(v) = sales {
            observed_sales.push(v);
        }

        let category = label_cell(row, category_idx, &mut report);
        let region = label_cell(row, region_idx, &mut report);
        parsed.push((date, sales, category, region));
    }

    if parsed.is_empty() {
        return Err(AppError::insufficient_data(format!(
            "No rows with a parseable '{}' date remain out of {} read.",
            mapping.date, report.rows_in
        )));
    }

    let median = stats::median(&observed_sales).ok_or_else(|| {
        AppError::insufficient_data(format!(
            "Column '{}' has no numeric values in {} rows.",
            mapping.sales,
            parsed.len()
        ))
    })?;

    let mut records: Vec<SalesRecord> = parsed
        .into_iter()
        .map(|(date, sales, category, region)| {
            let sales = sales.unwrap_or_else(|| {
                report.imputed_sales += 1;
                median
            });
            SalesRecord {
                date,
                sales,
                category,
                region,
            }
        })
        .collect();

    remove_outliers(&mut records, &mut report);
    report.rows_out = records.len();

    if records.is_empty() {
        return Err(AppError::insufficient_data(
            "No rows remain after outlier removal.",
        ));
    }

    Ok(CleanedData { records, report })
}

/// Keep only sales inside the `[q1 - 1.5 IQR, q3 + 1.5 IQR]` fence.
fn remove_outliers(records: &mut Vec<SalesRecord>, report: &mut CleanReport) {
    let values: Vec<f64> = records.iter().map(|r| r.sales).collect();
    let (Some(q1), Some(q3)) = (stats::quantile(&values, 0.25), stats::quantile(&values, 0.75))
    else {
        return;
    };
    let iqr = q3 - q1;
    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;

    let before = records.len();
    records.retain(|r| r.sales >= lower && r.sales <= upper);
    report.outliers_removed = before - records.len();
}

fn label_cell(row: &[String], idx: Option<usize>, report: &mut CleanReport) -> Option<String> {
    let idx = idx?;
    match row.get(idx).map(|s| s.trim()) {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => {
            report.imputed_labels += 1;
            Some(LABEL_FILL.to_string())
        }
    }
}

/// Parse a date from the small set of formats real retail exports use.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    const FMTS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    FMTS.iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_number(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> ColumnMapping {
        ColumnMapping {
            date: "Order Date".to_string(),
            sales: "Sales".to_string(),
            category: Some("Category".to_string()),
            region: None,
        }
    }

    fn table(rows: Vec<Vec<&str>>) -> RawTable {
        RawTable {
            headers: vec![
                "Order Date".to_string(),
                "Sales".to_string(),
                "Category".to_string(),
            ],
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    #[test]
    fn drops_rows_with_invalid_dates() {
        let t = table(vec![
            vec!["2024-01-05", "10", "Tech"],
            vec!["not a date", "11", "Tech"],
            vec!["2024-01-07", "12", "Tech"],
        ]);
        let cleaned = clean(&t, &mapping()).unwrap();
        assert_eq!(cleaned.report.invalid_dates, 1);
        assert_eq!(cleaned.records.len(), 2);
    }

    #[test]
    fn imputes_missing_sales_with_median() {
        let t = table(vec![
            vec!["2024-01-05", "10", "Tech"],
            vec!["2024-01-06", "", "Tech"],
            vec!["2024-01-07", "20", "Tech"],
            vec!["2024-01-08", "30", "Tech"],
        ]);
        let cleaned = clean(&t, &mapping()).unwrap();
        assert_eq!(cleaned.report.imputed_sales, 1);
        // Median of the observed values {10, 20, 30}.
        assert!((cleaned.records[1].sales - 20.0).abs() < 1e-12);
    }

    #[test]
    fn imputes_missing_labels() {
        let t = table(vec![
            vec!["2024-01-05", "10", ""],
            vec!["2024-01-06", "11", "Office"],
        ]);
        let cleaned = clean(&t, &mapping()).unwrap();
        assert_eq!(cleaned.report.imputed_labels, 1);
        assert_eq!(cleaned.records[0].category.as_deref(), Some("Unknown"));
        assert_eq!(cleaned.records[1].category.as_deref(), Some("Office"));
    }

    #[test]
    fn strips_iqr_outliers() {
        let mut rows: Vec<Vec<String>> = (1..=20)
            .map(|i| {
                vec![
                    format!("2024-01-{i:02}"),
                    format!("{}", 100 + i),
                    "Tech".to_string(),
                ]
            })
            .collect();
        rows.push(vec![
            "2024-01-21".to_string(),
            "100000".to_string(),
            "Tech".to_string(),
        ]);
        let t = RawTable {
            headers: vec![
                "Order Date".to_string(),
                "Sales".to_string(),
                "Category".to_string(),
            ],
            rows,
        };
        let cleaned = clean(&t, &mapping()).unwrap();
        assert_eq!(cleaned.report.outliers_removed, 1);
        assert!(cleaned.records.iter().all(|r| r.sales < 1000.0));
    }

    #[test]
    fn missing_mapped_column_is_a_schema_error() {
        let t = table(vec![vec!["2024-01-05", "10", "Tech"]]);
        let bad = ColumnMapping {
            date: "Shipped".to_string(),
            sales: "Sales".to_string(),
            category: None,
            region: None,
        };
        let err = clean(&t, &bad).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Schema);
        assert!(err.to_string().contains("Shipped"));
    }

    #[test]
    fn parses_common_date_formats() {
        assert!(parse_date("2024-03-01").is_some());
        assert!(parse_date("03/01/2024").is_some());
        assert!(parse_date("2024/03/01").is_some());
        assert!(parse_date("").is_none());
        assert!(parse_date("yesterday").is_none());
    }
}
