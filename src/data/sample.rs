//! Synthetic retail transaction generation.
//!
//! Used when no input file is given, and as the fallback when a provided
//! dataset fails the suitability assessment. The generator is seeded, so a
//! fixed `(months, seed)` pair always yields the same transactions.
//!
//! The shape is deliberately forecastable: a linear upward trend in the
//! monthly totals, a November/December uplift, and mild Gaussian noise per
//! transaction.

use chrono::{Datelike, Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::SalesRecord;
use crate::error::AppError;

/// First day of the generated history. A fixed anchor keeps runs
/// reproducible regardless of the wall clock.
const SAMPLE_START: (i32, u32, u32) = (2022, 1, 1);

/// Mean transactions per day.
const TXN_PER_DAY: usize = 3;

/// Base transaction amount in the first month.
const BASE_AMOUNT: f64 = 120.0;

/// Added per month of history to every transaction (the trend).
const TREND_PER_MONTH: f64 = 2.5;

/// Multiplier applied in November and December.
const HOLIDAY_UPLIFT: f64 = 1.4;

/// Relative noise applied per transaction.
const NOISE_STD: f64 = 0.15;

const CATEGORIES: [&str; 3] = ["Furniture", "Office Supplies", "Technology"];
const REGIONS: [&str; 4] = ["East", "West", "Central", "South"];

/// Generate `months` full calendar months of daily transactions.
pub fn generate(months: usize, seed: u64) -> Result<Vec<SalesRecord>, AppError> {
    if months == 0 {
        return Err(AppError::config("Sample history must cover at least one month."));
    }

    let (y, m, d) = SAMPLE_START;
    let start = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| AppError::config("Invalid sample anchor date."))?;
    let end = start
        .checked_add_months(chrono::Months::new(months as u32))
        .ok_or_else(|| AppError::config(format!("Sample history of {months} months overflows the calendar.")))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, NOISE_STD)
        .map_err(|e| AppError::model(format!("Noise distribution error: {e}")))?;

    let mut records = Vec::with_capacity(months * 31 * TXN_PER_DAY);
    let mut date = start;
    while date < end {
        let month_index = (date.year() - start.year()) * 12 + date.month() as i32
            - start.month() as i32;
        let seasonal = if date.month() == 11 || date.month() == 12 {
            HOLIDAY_UPLIFT
        } else {
            1.0
        };
        let level = (BASE_AMOUNT + TREND_PER_MONTH * month_index as f64) * seasonal;

        let n_txn = rng.gen_range(1..=2 * TXN_PER_DAY - 1);
        for _ in 0..n_txn {
            let amount = (level * (1.0 + noise.sample(&mut rng))).max(1.0);
            records.push(SalesRecord {
                date,
                sales: amount,
                category: Some(CATEGORIES[rng.gen_range(0..CATEGORIES.len())].to_string()),
                region: Some(REGIONS[rng.gen_range(0..REGIONS.len())].to_string()),
            });
        }
        date += Duration::days(1);
    }

    Ok(records)
}
