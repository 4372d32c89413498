//! Command-line parsing for the sales forecaster.
//!
//! Argument parsing and command dispatch stay separate from the pipeline
//! and modeling code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "salescast", version, about = "Retail sales forecasting pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline: load, validate, clean, model, evaluate, export.
    Run(RunArgs),
}

/// Options for a forecasting run.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Input sales CSV. Omit to run on the built-in sample dataset.
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Directory for exported artifacts (created if missing).
    #[arg(short = 'o', long, default_value = "out", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Fraction of the monthly series held out for evaluation.
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Months to forecast beyond the last observed month.
    #[arg(long, default_value_t = 12)]
    pub horizon: usize,

    /// Random seed for the forest and the sample generator.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Trees per ensemble.
    #[arg(long, default_value_t = 100)]
    pub trees: usize,

    /// Maximum tree depth.
    #[arg(long, default_value_t = 3)]
    pub max_depth: usize,

    /// Boosting learning rate.
    #[arg(long, default_value_t = 0.1)]
    pub learning_rate: f64,

    /// Months of synthetic history when the sample dataset is used.
    #[arg(long, default_value_t = 36)]
    pub sample_months: usize,

    /// Fail instead of falling back to the sample dataset when the input
    /// scores below the suitability minimum.
    #[arg(long)]
    pub no_sample_fallback: bool,

    /// Skip PNG chart rendering.
    #[arg(long)]
    pub no_charts: bool,

    /// Never prompt for unresolved columns; fail instead.
    #[arg(long)]
    pub no_prompt: bool,
}
