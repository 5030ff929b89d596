//! Aggregation pipeline: date filtering and group-by sums over the loaded records.
//!
//! Every function here is pure. Inputs are borrowed slices; outputs are new
//! collections, so the session's dataset is never mutated. Empty inputs
//! always produce empty mappings or zero totals.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{DailyRecord, DayTypeMetric, DayTypeTotals, Dated, HourlyRecord, TimeBucket, YearIndex};

mod peak;

pub use peak::annotate_peaks;

/// Keep records dated within `[start, end]` (inclusive).
///
/// `start > end` is a degenerate range and yields an empty subset.
pub fn filter_by_date_range<T: Dated + Clone>(records: &[T], start: NaiveDate, end: NaiveDate) -> Vec<T> {
    if start > end {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| {
            let d = r.date();
            d >= start && d <= end
        })
        .cloned()
        .collect()
}

/// Sum the working-day and holiday indicator flags.
///
/// This counts flagged days, not rentals on those days.
pub fn total_by_day_type(daily: &[DailyRecord]) -> DayTypeTotals {
    daily.iter().fold(DayTypeTotals::default(), |mut acc, r| {
        acc.working_days_total += u64::from(r.working_day);
        acc.holidays_total += u64::from(r.holiday);
        acc
    })
}

/// Sum rentals over working days and over holidays.
pub fn rentals_by_day_type(daily: &[DailyRecord]) -> DayTypeTotals {
    daily.iter().fold(DayTypeTotals::default(), |mut acc, r| {
        if r.working_day {
            acc.working_days_total += r.rentals;
        }
        if r.holiday {
            acc.holidays_total += r.rentals;
        }
        acc
    })
}

/// Day-type totals under the chosen metric.
pub fn day_type_totals(daily: &[DailyRecord], metric: DayTypeMetric) -> DayTypeTotals {
    match metric {
        DayTypeMetric::Flags => total_by_day_type(daily),
        DayTypeMetric::Rentals => rentals_by_day_type(daily),
    }
}

/// Rentals per weekday (0 = Sunday). Weekdays with no records are absent.
pub fn total_by_weekday(daily: &[DailyRecord]) -> BTreeMap<u8, u64> {
    let mut out = BTreeMap::new();
    for r in daily {
        *out.entry(r.weekday).or_insert(0) += r.rentals;
    }
    out
}

/// Partition a daily subset into (first year, second year).
pub fn split_by_year(daily: &[DailyRecord]) -> (Vec<DailyRecord>, Vec<DailyRecord>) {
    daily.iter().partition(|r| r.year == YearIndex::First)
}

/// The records of a single year.
pub fn records_for_year(daily: &[DailyRecord], year: YearIndex) -> Vec<DailyRecord> {
    daily.iter().filter(|r| r.year == year).copied().collect()
}

/// Number of hourly records per time bucket. All three buckets are present.
pub fn total_by_time_bucket(hourly: &[HourlyRecord]) -> BTreeMap<TimeBucket, u64> {
    let mut out: BTreeMap<TimeBucket, u64> = TimeBucket::ALL.iter().map(|&b| (b, 0)).collect();
    for r in hourly {
        *out.entry(r.bucket()).or_insert(0) += 1;
    }
    out
}

/// Rentals per hour, restricted to one time bucket.
pub fn hourly_rentals_for_bucket(hourly: &[HourlyRecord], bucket: TimeBucket) -> BTreeMap<u8, u64> {
    let mut out = BTreeMap::new();
    for r in hourly.iter().filter(|r| r.bucket() == bucket) {
        *out.entry(r.hour()).or_insert(0) += r.rentals();
    }
    out
}

/// Rentals per calendar month (1..=12). Months without records are absent.
pub fn monthly_totals(daily: &[DailyRecord]) -> BTreeMap<u32, u64> {
    let mut out = BTreeMap::new();
    for r in daily {
        *out.entry(r.date.month()).or_insert(0) += r.rentals;
    }
    out
}
