//! Shared dashboard pipeline used by the CLI, the TUI and the JSON export.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! date filter -> day-type totals -> weekday peaks -> bucket counts -> hourly peaks -> monthly series
//!
//! The front-ends can then focus on presentation (printing vs widgets vs files).

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{
    annotate_peaks, day_type_totals, filter_by_date_range, hourly_rentals_for_bucket, monthly_totals,
    records_for_year, total_by_time_bucket, total_by_weekday,
};
use crate::data::Dataset;
use crate::domain::{Annotated, DayTypeMetric, DayTypeTotals, Selection, TimeBucket, YearIndex, YearSelection};

/// Ranges shorter than this many days trigger the "pick at least a week" hint.
pub const MIN_SUGGESTED_RANGE_DAYS: i64 = 7;

/// Monthly rentals for one year of the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSeries {
    pub year: YearIndex,
    pub label: String,
    /// Month (1..=12) -> rentals. Months without data are absent.
    pub months: BTreeMap<u32, u64>,
}

/// Everything the renderers need for one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub bucket: TimeBucket,
    pub years: YearSelection,
    pub day_type_metric: DayTypeMetric,

    pub daily_rows: usize,
    pub hourly_rows: usize,
    /// True when the range is shorter than a week.
    pub short_range: bool,

    pub day_type: DayTypeTotals,
    pub weekday: Vec<Annotated<u8>>,
    pub bucket_counts: BTreeMap<TimeBucket, u64>,
    pub hourly: Vec<Annotated<u8>>,
    pub monthly: Vec<YearSeries>,
}

impl DashboardSummary {
    /// Hours of the selected bucket that attain the maximum rentals.
    pub fn peak_hours(&self) -> Vec<u8> {
        self.hourly.iter().filter(|a| a.is_peak()).map(|a| a.key).collect()
    }

    /// Weekdays that attain the maximum rentals.
    pub fn peak_weekdays(&self) -> Vec<u8> {
        self.weekday.iter().filter(|a| a.is_peak()).map(|a| a.key).collect()
    }
}

/// Run every aggregation for `selection` over `dataset`.
pub fn run_dashboard(dataset: &Dataset, selection: &Selection) -> DashboardSummary {
    let started = Instant::now();

    let daily = filter_by_date_range(dataset.daily(), selection.start, selection.end);
    let hourly = filter_by_date_range(dataset.hourly(), selection.start, selection.end);

    let day_type = day_type_totals(&daily, selection.day_type_metric);
    let weekday = annotate_peaks(&total_by_weekday(&daily));
    let bucket_counts = total_by_time_bucket(&hourly);
    let hourly_totals = annotate_peaks(&hourly_rentals_for_bucket(&hourly, selection.bucket));

    let monthly = selection
        .years
        .years()
        .iter()
        .map(|&year| YearSeries {
            year,
            label: year.calendar_year().to_string(),
            months: monthly_totals(&records_for_year(&daily, year)),
        })
        .collect();

    let span_days = (selection.end - selection.start).num_days() + 1;

    debug!(
        start = %selection.start,
        end = %selection.end,
        daily_rows = daily.len(),
        hourly_rows = hourly.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "dashboard recomputed"
    );

    DashboardSummary {
        start: selection.start,
        end: selection.end,
        bucket: selection.bucket,
        years: selection.years,
        day_type_metric: selection.day_type_metric,
        daily_rows: daily.len(),
        hourly_rows: hourly.len(),
        short_range: span_days < MIN_SUGGESTED_RANGE_DAYS,
        day_type,
        weekday,
        bucket_counts,
        hourly: hourly_totals,
        monthly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DailyRecord, HourlyRecord};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_dataset() -> Dataset {
        let daily = vec![
            DailyRecord {
                date: ymd(2011, 1, 1),
                working_day: true,
                holiday: false,
                weekday: 6,
                year: YearIndex::First,
                rentals: 100,
            },
            DailyRecord {
                date: ymd(2011, 1, 2),
                working_day: false,
                holiday: true,
                weekday: 0,
                year: YearIndex::First,
                rentals: 50,
            },
            DailyRecord {
                date: ymd(2012, 2, 5),
                working_day: true,
                holiday: false,
                weekday: 0,
                year: YearIndex::Second,
                rentals: 300,
            },
        ];
        let hourly = vec![
            HourlyRecord::new(ymd(2011, 1, 1), 7, 10),
            HourlyRecord::new(ymd(2011, 1, 1), 8, 30),
            HourlyRecord::new(ymd(2011, 1, 2), 8, 5),
            HourlyRecord::new(ymd(2011, 1, 2), 20, 4),
            HourlyRecord::new(ymd(2012, 2, 5), 9, 80),
        ];
        Dataset::from_records(daily, hourly)
    }

    fn selection(start: NaiveDate, end: NaiveDate) -> Selection {
        Selection {
            start,
            end,
            bucket: TimeBucket::Morning,
            years: YearSelection::Both,
            day_type_metric: DayTypeMetric::Flags,
        }
    }

    #[test]
    fn two_day_range_sums_flags() {
        let ds = sample_dataset();
        let summary = run_dashboard(&ds, &selection(ymd(2011, 1, 1), ymd(2011, 1, 2)));
        assert_eq!(
            summary.day_type,
            DayTypeTotals {
                working_days_total: 1,
                holidays_total: 1
            }
        );
        assert_eq!(summary.daily_rows, 2);
        assert_eq!(summary.hourly_rows, 4);
        assert!(summary.short_range);
        assert_eq!(summary.peak_weekdays(), vec![6]);
        assert_eq!(summary.peak_hours(), vec![8]);
        assert_eq!(summary.bucket_counts[&TimeBucket::Morning], 3);
        assert_eq!(summary.bucket_counts[&TimeBucket::Night], 1);
    }

    #[test]
    fn monthly_series_follow_year_selection() {
        let ds = sample_dataset();
        let mut sel = selection(ymd(2011, 1, 1), ymd(2012, 12, 31));
        let both = run_dashboard(&ds, &sel);
        assert!(!both.short_range);
        assert_eq!(both.monthly.len(), 2);
        assert_eq!(both.monthly[0].label, "2011");
        assert_eq!(both.monthly[0].months.get(&1), Some(&150));
        assert_eq!(both.monthly[1].months.get(&2), Some(&300));

        sel.years = YearSelection::Second;
        let second = run_dashboard(&ds, &sel);
        assert_eq!(second.monthly.len(), 1);
        assert_eq!(second.monthly[0].year, YearIndex::Second);
    }

    #[test]
    fn inverted_range_yields_empty_summary() {
        let ds = sample_dataset();
        let summary = run_dashboard(&ds, &selection(ymd(2012, 1, 1), ymd(2011, 1, 1)));
        assert_eq!(summary.daily_rows, 0);
        assert_eq!(summary.hourly_rows, 0);
        assert_eq!(summary.day_type, DayTypeTotals::default());
        assert!(summary.weekday.is_empty());
        assert!(summary.hourly.is_empty());
        assert!(summary.monthly.iter().all(|s| s.months.is_empty()));
        assert!(summary.bucket_counts.values().all(|&v| v == 0));
    }

    #[test]
    fn rentals_metric_is_opt_in() {
        let ds = sample_dataset();
        let mut sel = selection(ymd(2011, 1, 1), ymd(2011, 1, 2));
        sel.day_type_metric = DayTypeMetric::Rentals;
        let summary = run_dashboard(&ds, &sel);
        assert_eq!(summary.day_type.working_days_total, 100);
        assert_eq!(summary.day_type.holidays_total, 50);
    }
}
