//! Monthly aggregation of row-level records.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};

use crate::domain::{SalesRecord, TimeSeriesPoint};

/// First day of the record's calendar month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // from_ymd_opt with day 1 only fails for out-of-range years, which
    // NaiveDate cannot represent in the first place.
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// The month boundary `n` months after `month`.
pub fn months_after(month: NaiveDate, n: u32) -> NaiveDate {
    month + Months::new(n)
}

/// Collapse records into one summed point per observed calendar month.
///
/// Output is sorted ascending with no duplicate months. Months with zero
/// source records produce no point at all: gaps are preserved, not
/// interpolated and not filled with zeros. Aggregating an already-monthly
/// series again is a no-op.
pub fn aggregate_monthly<'a, I>(records: I) -> Vec<TimeSeriesPoint>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        *sums.entry(month_start(record.date)).or_insert(0.0) += record.sales;
    }

    sums.into_iter()
        .map(|(month, value)| TimeSeriesPoint { month, value })
        .collect()
}
