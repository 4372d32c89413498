//! Chronological train/test splitting.

use crate::domain::{FeaturedPoint, TrainTestSplit};
use crate::error::AppError;

pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Partition the series into an earliest `1 - test_fraction` train slice and
/// a latest `test_fraction` test slice, by index after sorting by month.
///
/// Order is the sole criterion. A random shuffle would leak future months
/// into training, so there is no shuffle mode at all.
pub fn chronological_split(
    points: &[FeaturedPoint],
    test_fraction: f64,
) -> Result<TrainTestSplit, AppError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(AppError::config(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let n = points.len();
    if n < 2 {
        return Err(AppError::insufficient_data(format!(
            "Cannot split {n} point(s) into train and test; at least 2 are required."
        )));
    }

    // Guard against unsorted input; the split boundary is meaningless otherwise.
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.month);

    let split_index = (n as f64 * (1.0 - test_fraction)).floor() as usize;
    if split_index == 0 || split_index == n {
        return Err(AppError::insufficient_data(format!(
            "test_fraction {test_fraction} over {n} points leaves an empty partition \
             (split index {split_index})."
        )));
    }

    let test = sorted.split_off(split_index);
    Ok(TrainTestSplit {
        train: sorted,
        test,
    })
}
