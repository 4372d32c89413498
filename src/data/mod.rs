//! Built-in datasets.

pub mod sample;
