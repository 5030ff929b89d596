//! Export a dashboard summary to JSON.
//!
//! The export is meant to be easy to consume in notebooks or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::app::pipeline::DashboardSummary;
use crate::error::AppError;

/// Write the summary as pretty-printed JSON.
pub fn write_summary_json(path: &Path, summary: &DashboardSummary) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)
        .map_err(|e| AppError::runtime(format!("Failed to write export JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_dashboard;
    use crate::data::Dataset;
    use crate::domain::{DailyRecord, DayTypeMetric, HourlyRecord, Selection, TimeBucket, YearIndex, YearSelection};
    use chrono::NaiveDate;

    #[test]
    fn summary_json_has_expected_shape() {
        let date = NaiveDate::from_ymd_opt(2011, 1, 3).unwrap();
        let dataset = Dataset::from_records(
            vec![DailyRecord {
                date,
                working_day: true,
                holiday: false,
                weekday: 1,
                year: YearIndex::First,
                rentals: 1349,
            }],
            vec![HourlyRecord::new(date, 17, 120)],
        );
        let summary = run_dashboard(
            &dataset,
            &Selection {
                start: date,
                end: date,
                bucket: TimeBucket::Afternoon,
                years: YearSelection::First,
                day_type_metric: DayTypeMetric::Flags,
            },
        );

        let path = std::env::temp_dir().join(format!("bike-dash-export-{}.json", std::process::id()));
        write_summary_json(&path, &summary).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["start"], "2011-01-03");
        assert_eq!(value["bucket"], "afternoon");
        assert_eq!(value["day_type"]["working_days_total"], 1);
        assert_eq!(value["weekday"][0]["key"], 1);
        assert_eq!(value["weekday"][0]["emphasis"], "peak");
        assert_eq!(value["bucket_counts"]["afternoon"], 1);
        assert_eq!(value["hourly"][0]["value"], 120);
        assert_eq!(value["monthly"][0]["months"]["1"], 1349);
    }

    #[test]
    fn unwritable_path_is_a_runtime_error() {
        let dataset = Dataset::from_records(Vec::new(), Vec::new());
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        let summary = run_dashboard(
            &dataset,
            &Selection {
                start: date,
                end: date,
                bucket: TimeBucket::Morning,
                years: YearSelection::Both,
                day_type_metric: DayTypeMetric::Flags,
            },
        );
        let err = write_summary_json(Path::new("/definitely/not/a/dir/out.json"), &summary).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_RUNTIME);
    }
}
