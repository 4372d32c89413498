//! The monthly time-series core: aggregation, lag/rolling feature
//! derivation, and the chronological train/test split.
//!
//! This is the part of the pipeline with real invariants. Violating any of
//! them (unsorted aggregation, a lag that peeks forward, a shuffled split)
//! silently corrupts every metric downstream, so each function both enforces
//! and tests its own contract.

pub mod aggregate;
pub mod features;
pub mod split;

pub use aggregate::{aggregate_monthly, month_start, months_after};
pub use features::derive_features;
pub use split::chronological_split;
