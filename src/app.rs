//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the forecasting pipeline
//! - prints the run summary
//! - writes the CSV/report/chart artifacts

use clap::Parser;

use crate::cli::{Command, RunArgs};
use crate::cli::prompt::PromptFallback;
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::schema::{MappingFallback, NoFallback};

pub mod pipeline;

pub const FORECAST_FILE: &str = "forecast_data.csv";
pub const CATEGORY_FILE: &str = "category_data.csv";
pub const REPORT_FILE: &str = "business_report.txt";
pub const FORECAST_CHART_FILE: &str = "forecast_chart.png";
pub const COMPARISON_CHART_FILE: &str = "model_comparison.png";

/// Entry point for the `salescast` binary.
pub fn run() -> Result<(), AppError> {
    // We want `salescast` and `salescast -i sales.csv` to behave like
    // `salescast run ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);

    let prompt = PromptFallback;
    let no_prompt = NoFallback;
    let fallback: &dyn MappingFallback = if args.no_prompt { &no_prompt } else { &prompt };

    let output = pipeline::run(&config, fallback)?;

    println!("{}", crate::report::format::format_run_summary(&config, &output));

    std::fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::io(format!(
            "Failed to create output directory '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    crate::io::export::write_forecast_csv(
        &config.out_dir.join(FORECAST_FILE),
        &output.series,
        &output.future,
    )?;
    if !output.categories.is_empty() {
        crate::io::export::write_category_csv(
            &config.out_dir.join(CATEGORY_FILE),
            &output.categories,
        )?;
    }

    let report = crate::report::format::format_business_report(&config, &output);
    crate::report::write_business_report(&config.out_dir.join(REPORT_FILE), &report)?;

    if config.charts {
        crate::plot::render_forecast_chart(
            &config.out_dir.join(FORECAST_CHART_FILE),
            &output.series,
            &output.future,
        )?;
        if output.models.iter().any(|m| m.metrics.is_some()) {
            crate::plot::render_comparison_chart(
                &config.out_dir.join(COMPARISON_CHART_FILE),
                &output.models,
            )?;
        }
    }

    println!("Artifacts written to {}", config.out_dir.display());
    Ok(())
}

pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    RunConfig {
        input: args.input.clone(),
        out_dir: args.out_dir.clone(),
        test_fraction: args.test_fraction,
        horizon_months: args.horizon,
        seed: args.seed,
        n_trees: args.trees,
        max_depth: args.max_depth,
        learning_rate: args.learning_rate,
        sample_months: args.sample_months,
        no_sample_fallback: args.no_sample_fallback,
        charts: !args.no_charts,
    }
}

/// Rewrite argv so `salescast` defaults to `salescast run`.
///
/// Rules:
/// - `salescast`                       -> `salescast run`
/// - `salescast -i sales.csv ...`      -> `salescast run -i sales.csv ...`
/// - `salescast --help/--version/-h`   -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1 == "run" {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}
