//! Shared domain types for the forecasting pipeline.

mod types;

pub use types::*;
