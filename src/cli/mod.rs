//! Command-line parsing for the weekly sales forecaster.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline and the front-ends.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ForecastMethod, OutputFormat};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "salescast", version, about = "Weekly sales forecasting from a CSV export")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a file and print the detected columns and the last weeks of sales.
    Preview(InputArgs),
    /// Load a file, forecast the next 8 weeks, and print a table and chart.
    Forecast(ForecastArgs),
    /// Launch the interactive TUI (press `f` to forecast).
    Tui(ForecastArgs),
    /// Print a synthetic daily sales CSV to stdout.
    Sample(SampleArgs),
}

/// Input file selection.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Sales CSV. Without it, an interactive picker lists CSV files here.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Output format for printed reports.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Options for forecasting.
#[derive(Debug, Args, Clone)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Forecasting method.
    #[arg(short = 'm', long, value_enum, env = "SALESCAST_METHOD", default_value_t = ForecastMethod::Linear)]
    pub method: ForecastMethod,

    /// Seed for the simulated uncertainty intervals (decomposable method).
    #[arg(long, env = "SALESCAST_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for synthetic data.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Number of weeks of daily rows.
    #[arg(long, default_value_t = 52)]
    pub weeks: usize,

    /// First day (YYYY-MM-DD).
    #[arg(long, default_value = "2023-01-02")]
    pub start: chrono::NaiveDate,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_flags_parse() {
        let cli = Cli::try_parse_from([
            "salescast", "forecast", "-f", "sales.csv", "--method", "seasonal", "--format", "json", "--no-plot",
        ])
        .unwrap();
        let Command::Forecast(args) = cli.command else {
            panic!("expected forecast");
        };
        assert_eq!(args.input.file, Some(PathBuf::from("sales.csv")));
        assert_eq!(args.input.format, OutputFormat::Json);
        assert_eq!(args.method, ForecastMethod::Seasonal);
        assert!(args.no_plot);
    }

    #[test]
    fn unknown_method_is_rejected() {
        assert!(Cli::try_parse_from(["salescast", "forecast", "--method", "arima"]).is_err());
    }

    #[test]
    fn sample_defaults() {
        let cli = Cli::try_parse_from(["salescast", "sample"]).unwrap();
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.weeks, 52);
        assert_eq!(args.seed, 42);
    }
}
