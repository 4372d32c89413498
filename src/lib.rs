//! `salescast` library crate.
//!
//! The binary (`salescast`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future service front-end, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod clean;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod eval;
pub mod features;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod schema;
pub mod series;
pub mod validate;
