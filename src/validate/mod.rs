//! Dataset suitability scoring.
//!
//! Before the pipeline invests in cleaning and model fitting it checks four
//! requirements and turns them into a 0..100 score. A low score is
//! recoverable: the caller switches to the synthetic sample dataset instead
//! of proceeding with statistically meaningless results.

use crate::clean::parse_date;
use crate::domain::ColumnMapping;
use crate::error::AppError;
use crate::io::ingest::RawTable;

pub const MIN_RECORDS: usize = 100;
pub const MIN_DATE_RANGE_DAYS: i64 = 180;
pub const MIN_SUITABILITY_SCORE: f64 = 60.0;

/// Outcome of the suitability assessment. Field order mirrors the checks.
#[derive(Debug, Clone)]
pub struct SuitabilityReport {
    pub has_date_column: bool,
    pub has_sales_column: bool,
    pub sufficient_records: bool,
    pub sufficient_date_range: bool,

    pub n_records: usize,
    /// Days between the earliest and latest parseable date (0 if none parse).
    pub date_range_days: i64,
    /// Percentage of requirements met.
    pub score: f64,
}

impl SuitabilityReport {
    pub fn is_usable(&self) -> bool {
        self.score >= MIN_SUITABILITY_SCORE
    }
}

/// Score whether the resolved dataset is usable for forecasting.
pub fn assess(table: &RawTable, mapping: &ColumnMapping) -> Result<SuitabilityReport, AppError> {
    let date_idx = table.column_index(&mapping.date);
    let sales_idx = table.column_index(&mapping.sales);

    let has_date_column = date_idx.is_some();
    let has_sales_column = sales_idx.is_some();

    let date_range_days = match date_idx {
        Some(idx) => date_range_days(table, idx),
        None => 0,
    };

    let n_records = table.rows.len();
    let sufficient_records = n_records >= MIN_RECORDS;
    let sufficient_date_range = date_range_days >= MIN_DATE_RANGE_DAYS;

    let met = [
        has_date_column,
        has_sales_column,
        sufficient_records,
        sufficient_date_range,
    ]
    .iter()
    .filter(|&&m| m)
    .count();
    let score = met as f64 / 4.0 * 100.0;

    Ok(SuitabilityReport {
        has_date_column,
        has_sales_column,
        sufficient_records,
        sufficient_date_range,
        n_records,
        date_range_days,
        score,
    })
}

fn date_range_days(table: &RawTable, date_idx: usize) -> i64 {
    let mut min = None;
    let mut max = None;
    for row in &table.rows {
        let Some(cell) = row.get(date_idx) else { continue };
        let Some(date) = parse_date(cell) else { continue };
        min = Some(min.map_or(date, |m: chrono::NaiveDate| m.min(date)));
        max = Some(max.map_or(date, |m: chrono::NaiveDate| m.max(date)));
    }
    match (min, max) {
        (Some(lo), Some(hi)) => (hi - lo).num_days(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(n_rows: usize, spread_days: i64) -> RawTable {
        let start = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let rows = (0..n_rows)
            .map(|i| {
                let offset = if n_rows > 1 {
                    spread_days * i as i64 / (n_rows as i64 - 1)
                } else {
                    0
                };
                let d = start + chrono::Duration::days(offset);
                vec![d.format("%Y-%m-%d").to_string(), "10.0".to_string()]
            })
            .collect();
        RawTable {
            headers: vec!["Order Date".to_string(), "Sales".to_string()],
            rows,
        }
    }

    fn mapping() -> ColumnMapping {
        ColumnMapping {
            date: "Order Date".to_string(),
            sales: "Sales".to_string(),
            category: None,
            region: None,
        }
    }

    #[test]
    fn full_score_when_all_requirements_met() {
        let report = assess(&table(120, 365), &mapping()).unwrap();
        assert_eq!(report.score, 100.0);
        assert!(report.is_usable());
        assert_eq!(report.n_records, 120);
        assert_eq!(report.date_range_days, 365);
    }

    #[test]
    fn short_range_and_few_records_score_low() {
        let report = assess(&table(20, 30), &mapping()).unwrap();
        assert!(report.has_date_column);
        assert!(report.has_sales_column);
        assert!(!report.sufficient_records);
        assert!(!report.sufficient_date_range);
        assert_eq!(report.score, 50.0);
        assert!(!report.is_usable());
    }

    #[test]
    fn unmapped_columns_fail_their_requirements() {
        let bad = ColumnMapping {
            date: "missing".to_string(),
            sales: "also missing".to_string(),
            category: None,
            region: None,
        };
        let report = assess(&table(120, 365), &bad).unwrap();
        assert!(!report.has_date_column);
        assert!(!report.has_sales_column);
        assert!(!report.sufficient_date_range);
        assert_eq!(report.score, 25.0);
    }
}
