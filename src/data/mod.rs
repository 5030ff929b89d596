//! Session dataset: both relations loaded once and shared read-only.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::{DailyRecord, DataConfig, HourlyRecord};
use crate::error::AppError;
use crate::io::ingest::{parse_daily, parse_hourly, RowError};

pub mod source;

pub use source::SourceFetcher;

/// Per-file ingest bookkeeping, kept for reporting.
#[derive(Debug, Clone, Default)]
pub struct FileReport {
    pub source: String,
    pub rows_read: usize,
    pub rows_used: usize,
    pub row_errors: Vec<RowError>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub daily: FileReport,
    pub hourly: FileReport,
}

/// Immutable handle to the loaded relations.
///
/// Cloning is cheap: the record slices are reference-counted.
#[derive(Debug, Clone)]
pub struct Dataset {
    daily: Arc<[DailyRecord]>,
    hourly: Arc<[HourlyRecord]>,
    report: LoadReport,
}

impl Dataset {
    /// Fetch and parse both relations.
    pub fn load(config: &DataConfig) -> Result<Self, AppError> {
        let started = Instant::now();
        let fetcher = SourceFetcher::new(config.timeout_secs)?;

        let daily_label = config.daily.to_string();
        let daily_bytes = fetcher.fetch(&config.daily)?;
        let daily = parse_daily(daily_bytes.as_slice(), &daily_label)?;

        let hourly_label = config.hourly.to_string();
        let hourly_bytes = fetcher.fetch(&config.hourly)?;
        let hourly = parse_hourly(hourly_bytes.as_slice(), &hourly_label)?;

        let report = LoadReport {
            daily: FileReport {
                source: daily_label,
                rows_read: daily.rows_read,
                rows_used: daily.rows_used(),
                row_errors: daily.row_errors,
            },
            hourly: FileReport {
                source: hourly_label,
                rows_read: hourly.rows_read,
                rows_used: hourly.rows_used(),
                row_errors: hourly.row_errors,
            },
        };

        for file in [&report.daily, &report.hourly] {
            if !file.row_errors.is_empty() {
                warn!(
                    source = %file.source,
                    rejected = file.row_errors.len(),
                    "some rows were rejected during ingest"
                );
            }
        }

        info!(
            daily_rows = report.daily.rows_used,
            hourly_rows = report.hourly.rows_used,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dataset loaded"
        );

        Ok(Self::from_parts(daily.records, hourly.records, report))
    }

    /// Build a dataset from already-parsed records.
    pub fn from_records(daily: Vec<DailyRecord>, hourly: Vec<HourlyRecord>) -> Self {
        let report = LoadReport {
            daily: FileReport {
                source: "memory".to_string(),
                rows_read: daily.len(),
                rows_used: daily.len(),
                row_errors: Vec::new(),
            },
            hourly: FileReport {
                source: "memory".to_string(),
                rows_read: hourly.len(),
                rows_used: hourly.len(),
                row_errors: Vec::new(),
            },
        };
        Self::from_parts(daily, hourly, report)
    }

    fn from_parts(daily: Vec<DailyRecord>, hourly: Vec<HourlyRecord>, report: LoadReport) -> Self {
        Self {
            daily: daily.into(),
            hourly: hourly.into(),
            report,
        }
    }

    pub fn daily(&self) -> &[DailyRecord] {
        &self.daily
    }

    pub fn hourly(&self) -> &[HourlyRecord] {
        &self.hourly
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Earliest and latest date of the daily relation.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.daily.iter().map(|r| r.date).min()?;
        let max = self.daily.iter().map(|r| r.date).max()?;
        Some((min, max))
    }
}
