//! Numeric helpers: summary statistics and least-squares trend fitting.

pub mod stats;
pub mod trend;
