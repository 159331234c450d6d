//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - resolves the input CSV (flag or picker)
//! - runs the preview/forecast pipeline
//! - prints reports, plots, or JSON

use std::io::Write;

use clap::Parser;
use serde::Serialize;

use crate::cli::{Command, ForecastArgs, InputArgs, SampleArgs};
use crate::domain::{ForecastConfig, ForecastMethod, OutputFormat};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `salescast` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    // We want `salescast` and `salescast -f sales.csv` to behave like
    // `salescast tui ...`. Clap requires a subcommand name, so rewrite argv first.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal; log output would corrupt the alternate screen.
    if !matches!(cli.command, Command::Tui(_)) {
        crate::logging::init();
    }

    match cli.command {
        Command::Preview(args) => handle_preview(args),
        Command::Forecast(args) => handle_forecast(args),
        Command::Tui(args) => handle_tui(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_preview(args: InputArgs) -> Result<(), AppError> {
    let csv_path = crate::cli::picker::resolve_csv_path(args.file.clone())?;
    let mut config = ForecastConfig::new(csv_path, ForecastMethod::Linear);
    config.format = args.format;

    let preview = pipeline::load_preview(&config)?;
    match config.format {
        OutputFormat::Json => print_json(&preview),
        OutputFormat::Text => {
            print!("{}", crate::report::format_run_summary(&preview, &config));
            print!("{}", crate::report::format_preview(&preview));
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct ForecastReport<'a> {
    preview: &'a pipeline::Preview,
    forecast: &'a pipeline::ForecastRun,
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args)?;
    let preview = pipeline::load_preview(&config)?;

    if config.format == OutputFormat::Text {
        print!("{}", crate::report::format_run_summary(&preview, &config));
        println!("{}", crate::report::format_preview(&preview));
    }

    // On failure the preview above stays on screen; nothing partial is printed.
    let run = pipeline::run_forecast(&preview.series, &config)?;

    match config.format {
        OutputFormat::Json => print_json(&ForecastReport {
            preview: &preview,
            forecast: &run,
        }),
        OutputFormat::Text => {
            let label = preview.binding.value_label();
            println!("{}", crate::report::format_forecast(&run, label));
            if config.plot {
                print!(
                    "{}",
                    crate::plot::render_forecast_plot(&run.chart, config.plot_width, config.plot_height, label)
                );
            }
            Ok(())
        }
    }
}

fn handle_tui(args: ForecastArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args)?;
    crate::tui::run(config)
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = crate::data::SampleSpec {
        start: args.start,
        weeks: args.weeks,
        seed: args.seed,
    };
    crate::data::write_sample_csv(spec, std::io::stdout().lock())?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)
        .map_err(|e| AppError::new(4, format!("Failed to serialize JSON: {e}")))?;
    writeln!(stdout).map_err(|e| AppError::new(4, format!("Failed to write output: {e}")))
}

/// Build the pipeline configuration, resolving the CSV path.
pub fn forecast_config_from_args(args: &ForecastArgs) -> Result<ForecastConfig, AppError> {
    let csv_path = crate::cli::picker::resolve_csv_path(args.input.file.clone())?;
    let mut config = ForecastConfig::new(csv_path, args.method);
    config.seed = args.seed;
    config.format = args.input.format;
    config.plot = !args.no_plot;
    config.plot_width = args.width;
    config.plot_height = args.height;
    Ok(config)
}

/// Rewrite argv so `salescast` defaults to `salescast tui`.
///
/// Rules:
/// - `salescast`                      -> `salescast tui`
/// - `salescast -f x.csv ...`         -> `salescast tui -f x.csv ...`
/// - `salescast --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    let is_subcommand = matches!(arg1.as_str(), "preview" | "forecast" | "tui" | "sample");

    if !is_top_level_help_or_version && !is_subcommand && arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}
