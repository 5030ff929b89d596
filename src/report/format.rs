//! Formatted terminal output for a dashboard summary.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::DashboardSummary;
use crate::data::{FileReport, LoadReport};
use crate::domain::{DayTypeMetric, MONTH_LABELS, TimeBucket, weekday_label};

/// Row errors listed per file before the rest are summarized.
const MAX_LISTED_ROW_ERRORS: usize = 3;

/// Format what was loaded from each source.
pub fn format_load_report(report: &LoadReport) -> String {
    let mut out = String::new();
    out.push_str(&format_file_report("daily", &report.daily));
    out.push_str(&format_file_report("hourly", &report.hourly));
    out
}

fn format_file_report(kind: &str, file: &FileReport) -> String {
    let mut out = format!(
        "Loaded {kind}: {} ({}/{} rows used",
        file.source, file.rows_used, file.rows_read
    );
    if file.row_errors.is_empty() {
        out.push_str(")\n");
        return out;
    }
    out.push_str(&format!(", {} rejected)\n", file.row_errors.len()));
    for err in file.row_errors.iter().take(MAX_LISTED_ROW_ERRORS) {
        out.push_str(&format!("  line {}: {}\n", err.line, err.message));
    }
    let rest = file.row_errors.len().saturating_sub(MAX_LISTED_ROW_ERRORS);
    if rest > 0 {
        out.push_str(&format!("  ... and {rest} more\n"));
    }
    out
}

/// Format every table of the summary.
pub fn format_summary(summary: &DashboardSummary) -> String {
    let mut out = String::new();

    out.push_str("=== bike-dash - Bike Sharing Dashboard ===\n");
    out.push_str(&format!(
        "Range: {} .. {} | daily rows={} | hourly rows={}\n",
        summary.start, summary.end, summary.daily_rows, summary.hourly_rows
    ));
    if summary.short_range {
        out.push_str("Note: the range is shorter than one week; pick at least 7 days for meaningful totals.\n");
    }

    let metric = match summary.day_type_metric {
        DayTypeMetric::Flags => "days",
        DayTypeMetric::Rentals => "rentals",
    };
    out.push_str(&format!("\nWorking days vs holidays ({metric}):\n"));
    out.push_str(&format!("  {:<14} {:>10}\n", "Working Days", summary.day_type.working_days_total));
    out.push_str(&format!("  {:<14} {:>10}\n", "Holidays", summary.day_type.holidays_total));

    out.push_str("\nRentals per weekday (* = peak):\n");
    if summary.weekday.is_empty() {
        out.push_str("  (no data)\n");
    }
    for w in &summary.weekday {
        let mark = if w.is_peak() { "*" } else { " " };
        out.push_str(&format!("{mark} {:<4} {:>10}\n", weekday_label(w.key), w.value));
    }

    out.push_str("\nRecords per time bucket:\n");
    for bucket in TimeBucket::ALL {
        let count = summary.bucket_counts.get(&bucket).copied().unwrap_or(0);
        out.push_str(&format!("  {:<10} {:>10}\n", bucket.display_name(), count));
    }

    out.push_str(&format!("\nRentals per hour ({}):\n", summary.bucket.display_name()));
    if summary.hourly.is_empty() {
        out.push_str("  (no data)\n");
    }
    for h in &summary.hourly {
        let mark = if h.is_peak() { "*" } else { " " };
        out.push_str(&format!("{mark} {:02}:00 {:>10}\n", h.key, h.value));
    }
    let peaks = summary.peak_hours();
    if !peaks.is_empty() {
        out.push_str(&format!("  peak: {}\n", fmt_hours(&peaks)));
    }

    out.push_str("\nMonthly rentals:\n");
    out.push_str(&format!("  {:<5}", "Month"));
    for series in &summary.monthly {
        out.push_str(&format!(" {:>10}", series.label));
    }
    out.push('\n');
    for (idx, label) in MONTH_LABELS.iter().enumerate() {
        let month = idx as u32 + 1;
        out.push_str(&format!("  {label:<5}"));
        for series in &summary.monthly {
            let v = series.months.get(&month).copied().unwrap_or(0);
            out.push_str(&format!(" {v:>10}"));
        }
        out.push('\n');
    }

    out
}

fn fmt_hours(hours: &[u8]) -> String {
    let parts: Vec<String> = hours.iter().map(|h| format!("{h:02}:00")).collect();
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_dashboard;
    use crate::data::Dataset;
    use crate::domain::{DailyRecord, HourlyRecord, Selection, YearIndex, YearSelection};
    use crate::io::ingest::RowError;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summary_lists_peaks_and_zero_months() {
        let dataset = Dataset::from_records(
            vec![
                DailyRecord {
                    date: ymd(2011, 1, 1),
                    working_day: false,
                    holiday: false,
                    weekday: 6,
                    year: YearIndex::First,
                    rentals: 985,
                },
                DailyRecord {
                    date: ymd(2011, 1, 2),
                    working_day: false,
                    holiday: false,
                    weekday: 0,
                    year: YearIndex::First,
                    rentals: 801,
                },
            ],
            vec![
                HourlyRecord::new(ymd(2011, 1, 1), 17, 90),
                HourlyRecord::new(ymd(2011, 1, 2), 17, 10),
                HourlyRecord::new(ymd(2011, 1, 2), 13, 44),
            ],
        );
        let summary = run_dashboard(
            &dataset,
            &Selection {
                start: ymd(2011, 1, 1),
                end: ymd(2011, 1, 2),
                bucket: TimeBucket::Afternoon,
                years: YearSelection::First,
                day_type_metric: DayTypeMetric::Flags,
            },
        );

        let text = format_summary(&summary);
        assert!(text.contains("Note: the range is shorter than one week"));
        assert!(text.contains("* Sat         985"));
        assert!(text.contains("  Sun         801"));
        assert!(text.contains("* 17:00        100"));
        assert!(text.contains("peak: 17:00"));
        assert!(text.contains("  Jan         1786"));
        assert!(text.contains("  Feb            0"));
    }

    #[test]
    fn load_report_lists_rejected_rows() {
        let report = LoadReport {
            daily: FileReport {
                source: "day.csv".to_string(),
                rows_read: 10,
                rows_used: 5,
                row_errors: (0..5)
                    .map(|i| RowError {
                        line: i + 2,
                        message: "bad".to_string(),
                    })
                    .collect(),
            },
            hourly: FileReport {
                source: "hour.csv".to_string(),
                rows_read: 3,
                rows_used: 3,
                row_errors: Vec::new(),
            },
        };
        let text = format_load_report(&report);
        assert!(text.contains("Loaded daily: day.csv (5/10 rows used, 5 rejected)"));
        assert!(text.contains("  line 2: bad"));
        assert!(text.contains("  ... and 2 more"));
        assert!(text.contains("Loaded hourly: hour.csv (3/3 rows used)"));
    }
}
