//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging and `.env` configuration
//! - loads the daily/hourly datasets once
//! - runs the dashboard pipeline
//! - prints reports/plots, writes exports, or hands off to the TUI

use clap::Parser;
use tracing::info;

use crate::cli::{Command, DashArgs, ExportArgs, SummaryArgs};
use crate::data::source::{DAILY_ENV, DEFAULT_DAILY_URL, DEFAULT_HOURLY_URL, HOURLY_ENV, resolve_source};
use crate::data::Dataset;
use crate::domain::{DashboardConfig, DataConfig, Selection};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `bike-dash` binary.
pub fn run() -> Result<(), AppError> {
    // `bike-dash` and `bike-dash --start ...` behave like `bike-dash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let interactive = matches!(cli.command, Command::Tui(_));
    crate::logging::init(cli.verbose, cli.log_file.as_deref(), interactive)?;

    // A missing `.env` is fine; sources then come from flags or defaults.
    dotenvy::dotenv().ok();

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Summary(args) => handle_summary(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let mut config = dashboard_config_from_args(&args.dash);
    config.plot = !args.no_plot;
    config.plot_width = args.width;
    config.plot_height = args.height;
    config.export = args.export.clone();

    let dataset = Dataset::load(&config.data)?;
    let selection = resolve_selection(&config, &dataset)?;
    let summary = pipeline::run_dashboard(&dataset, &selection);

    println!("{}", crate::report::format_load_report(dataset.report()));
    println!("{}", crate::report::format_summary(&summary));

    if config.plot {
        println!(
            "{}",
            crate::plot::render_summary_charts(&summary, config.plot_width, config.plot_height)
        );
    }

    if let Some(path) = &config.export {
        crate::io::export::write_summary_json(path, &summary)?;
        info!(path = %path.display(), "summary exported");
    }

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args.dash);
    let dataset = Dataset::load(&config.data)?;
    let selection = resolve_selection(&config, &dataset)?;
    let summary = pipeline::run_dashboard(&dataset, &selection);

    crate::io::export::write_summary_json(&args.out, &summary)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

fn handle_tui(args: DashArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args);
    crate::tui::run(config)
}

pub fn dashboard_config_from_args(args: &DashArgs) -> DashboardConfig {
    DashboardConfig {
        data: DataConfig {
            daily: resolve_source(args.day_csv.as_deref(), DAILY_ENV, DEFAULT_DAILY_URL),
            hourly: resolve_source(args.hour_csv.as_deref(), HOURLY_ENV, DEFAULT_HOURLY_URL),
            timeout_secs: args.timeout_secs,
        },
        start: args.start,
        end: args.end,
        bucket: args.bucket,
        years: args.years,
        day_type_metric: args.day_type_metric,
        plot: true,
        plot_width: 60,
        plot_height: 12,
        export: None,
    }
}

/// Fill unset range ends from the dataset's date bounds.
pub fn resolve_selection(config: &DashboardConfig, dataset: &Dataset) -> Result<Selection, AppError> {
    let bounds = dataset.date_bounds();
    let start = config
        .start
        .or(bounds.map(|(min, _)| min))
        .ok_or_else(|| AppError::no_data("Daily dataset is empty; cannot derive a start date."))?;
    let end = config
        .end
        .or(bounds.map(|(_, max)| max))
        .ok_or_else(|| AppError::no_data("Daily dataset is empty; cannot derive an end date."))?;

    Ok(Selection {
        start,
        end,
        bucket: config.bucket,
        years: config.years,
        day_type_metric: config.day_type_metric,
    })
}

/// Rewrite argv so `bike-dash` defaults to `bike-dash tui`.
///
/// Rules:
/// - `bike-dash`                      -> `bike-dash tui`
/// - `bike-dash --start 2011-06-01`   -> `bike-dash tui --start 2011-06-01`
/// - `bike-dash --help/--version/-h`  -> unchanged (show top-level help/version)
/// - `bike-dash -v summary`           -> unchanged (global flags may precede a subcommand)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(skip_global_flags(&argv)).cloned() else {
        argv.insert(1.min(argv.len()), "tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "summary" | "export");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

/// Index of the first token after the leading global flags (`-v`, `--verbose`, `--log-file`).
fn skip_global_flags(argv: &[String]) -> usize {
    let mut idx = 1;
    while let Some(tok) = argv.get(idx) {
        let is_verbose =
            tok == "--verbose" || (tok.len() > 1 && tok.starts_with('-') && tok[1..].chars().all(|c| c == 'v'));
        if is_verbose || tok.starts_with("--log-file=") {
            idx += 1;
        } else if tok == "--log-file" {
            idx += 2;
        } else {
            break;
        }
    }
    idx
}
