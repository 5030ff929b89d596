//! Command-line parsing for the bike-sharing dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the loading/aggregation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::data::source::DEFAULT_TIMEOUT_SECS;
use crate::domain::{DayTypeMetric, TimeBucket, YearSelection};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bike-dash", version, about = "Bike-sharing usage dashboard (daily + hourly datasets)")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file (required to see logs while the TUI is running).
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(DashArgs),
    /// Print the summary tables and ASCII charts for one selection.
    Summary(SummaryArgs),
    /// Write the summary for one selection to a JSON file.
    Export(ExportArgs),
}

/// Data sources and selection, shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct DashArgs {
    /// Daily CSV (URL or path). Falls back to `BIKE_DASH_DAY_CSV`, then the published dataset.
    #[arg(long, value_name = "URL|PATH")]
    pub day_csv: Option<String>,

    /// Hourly CSV (URL or path). Falls back to `BIKE_DASH_HOUR_CSV`, then the published dataset.
    #[arg(long, value_name = "URL|PATH")]
    pub hour_csv: Option<String>,

    /// HTTP timeout for dataset downloads.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// First day of the range (YYYY-MM-DD). Defaults to the earliest date in the data.
    #[arg(long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD). Defaults to the latest date in the data.
    #[arg(long, value_name = "DATE")]
    pub end: Option<NaiveDate>,

    /// Time-of-day bucket for the hourly chart.
    #[arg(short = 'b', long, value_enum, default_value_t = TimeBucket::Morning)]
    pub bucket: TimeBucket,

    /// Year(s) for the monthly comparison.
    #[arg(short = 'y', long = "year", value_enum, default_value_t = YearSelection::Both)]
    pub years: YearSelection,

    /// What the working-day / holiday totals measure.
    #[arg(long, value_enum, default_value_t = DayTypeMetric::Flags)]
    pub day_type_metric: DayTypeMetric,
}

/// Options for the text summary.
#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub dash: DashArgs,

    /// Disable the ASCII charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Line-chart height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,

    /// Also write the summary to this JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for the JSON export.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub dash: DashArgs,

    /// Output JSON file.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_flags_parse() {
        let cli = Cli::parse_from([
            "bike-dash",
            "summary",
            "--start",
            "2011-02-01",
            "--end",
            "2011-03-01",
            "--bucket",
            "night",
            "--year",
            "2012",
            "--day-type-metric",
            "rentals",
            "--no-plot",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.dash.start, NaiveDate::from_ymd_opt(2011, 2, 1));
        assert_eq!(args.dash.bucket, TimeBucket::Night);
        assert_eq!(args.dash.years, YearSelection::Second);
        assert_eq!(args.dash.day_type_metric, DayTypeMetric::Rentals);
        assert!(args.no_plot);
    }

    #[test]
    fn export_requires_out() {
        assert!(Cli::try_parse_from(["bike-dash", "export"]).is_err());
        assert!(Cli::try_parse_from(["bike-dash", "export", "-o", "out.json"]).is_ok());
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["bike-dash", "summary", "--start", "2011-13-01"]).is_err());
    }
}
