//! Row-level feature engineering.
//!
//! Two families of derived fields, both attached to every record:
//!
//! - calendar attributes read straight off the date (year, month, quarter,
//!   day of week, weekend flag, Nov/Dec holiday-season flag)
//! - monthly aggregate statistics of the record's (year, month) group
//!   (mean sales, sample std, transaction count)
//!
//! The input is read-only; the output is a new vector.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::domain::{FeaturedRecord, SalesRecord};
use crate::math::stats;

/// Attach calendar and monthly-aggregate features to each record.
pub fn build(records: &[SalesRecord]) -> Vec<FeaturedRecord> {
    let monthly = monthly_groups(records);

    records
        .iter()
        .map(|record| {
            let date = record.date;
            let year = date.year();
            let month = date.month();
            let day_of_week = date.weekday().num_days_from_monday();
            let (monthly_mean, monthly_std, monthly_count) = monthly[&(year, month)];

            FeaturedRecord {
                record: record.clone(),
                year,
                month,
                quarter: (month - 1) / 3 + 1,
                day_of_week,
                is_weekend: day_of_week >= 5,
                is_holiday_season: month == 11 || month == 12,
                monthly_mean,
                monthly_std,
                monthly_count,
            }
        })
        .collect()
}

fn monthly_groups(records: &[SalesRecord]) -> BTreeMap<(i32, u32), (f64, f64, usize)> {
    let mut grouped: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for r in records {
        grouped
            .entry((r.date.year(), r.date.month()))
            .or_default()
            .push(r.sales);
    }

    grouped
        .into_iter()
        .map(|(key, values)| {
            (
                key,
                (stats::mean(&values), stats::sample_std(&values), values.len()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(y: i32, m: u32, d: u32, sales: f64) -> SalesRecord {
        SalesRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            sales,
            category: None,
            region: None,
        }
    }

    #[test]
    fn calendar_attributes() {
        // 2024-11-09 is a Saturday.
        let featured = build(&[record(2024, 11, 9, 50.0)]);
        let f = &featured[0];
        assert_eq!(f.year, 2024);
        assert_eq!(f.month, 11);
        assert_eq!(f.quarter, 4);
        assert_eq!(f.day_of_week, 5);
        assert!(f.is_weekend);
        assert!(f.is_holiday_season);

        // 2024-03-06 is a Wednesday.
        let featured = build(&[record(2024, 3, 6, 50.0)]);
        let f = &featured[0];
        assert_eq!(f.quarter, 1);
        assert_eq!(f.day_of_week, 2);
        assert!(!f.is_weekend);
        assert!(!f.is_holiday_season);
    }

    #[test]
    fn monthly_aggregates_are_per_group() {
        let featured = build(&[
            record(2024, 1, 2, 10.0),
            record(2024, 1, 20, 30.0),
            record(2024, 2, 5, 100.0),
        ]);
        assert!((featured[0].monthly_mean - 20.0).abs() < 1e-12);
        assert_eq!(featured[0].monthly_count, 2);
        assert!(featured[0].monthly_std > 0.0);

        assert!((featured[2].monthly_mean - 100.0).abs() < 1e-12);
        assert_eq!(featured[2].monthly_count, 1);
        // A single-transaction month has no spread.
        assert_eq!(featured[2].monthly_std, 0.0);
    }
}
