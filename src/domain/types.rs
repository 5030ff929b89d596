//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the CSV loader and held read-only for a session
//! - consumed by the aggregation pipeline
//! - exported to JSON alongside the computed summaries

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Calendar year that `year_index = 0` refers to.
pub const BASE_YEAR: i32 = 2011;

/// Weekday labels, indexed by the dataset's weekday (0 = Sunday).
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Month labels, indexed by `month - 1`.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn weekday_label(weekday: u8) -> &'static str {
    WEEKDAY_LABELS.get(weekday as usize).copied().unwrap_or("?")
}

pub fn month_label(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_LABELS.get(idx as usize))
        .copied()
        .unwrap_or("?")
}

/// Time-of-day bucket derived from the hour of an hourly record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    /// Hours 6..=11.
    Morning,
    /// Hours 12..=17.
    Afternoon,
    /// Everything else (18..=23 and 0..=5).
    Night,
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 3] = [TimeBucket::Morning, TimeBucket::Afternoon, TimeBucket::Night];

    pub fn from_hour(hour: u8) -> Self {
        match hour {
            6..=11 => TimeBucket::Morning,
            12..=17 => TimeBucket::Afternoon,
            _ => TimeBucket::Night,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TimeBucket::Morning => "Morning",
            TimeBucket::Afternoon => "Afternoon",
            TimeBucket::Night => "Night",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimeBucket::Morning => TimeBucket::Afternoon,
            TimeBucket::Afternoon => TimeBucket::Night,
            TimeBucket::Night => TimeBucket::Morning,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            TimeBucket::Morning => TimeBucket::Night,
            TimeBucket::Afternoon => TimeBucket::Morning,
            TimeBucket::Night => TimeBucket::Afternoon,
        }
    }
}

/// One of the two consecutive years covered by the dataset (`yr` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearIndex {
    First,
    Second,
}

impl YearIndex {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(YearIndex::First),
            1 => Some(YearIndex::Second),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            YearIndex::First => 0,
            YearIndex::Second => 1,
        }
    }

    pub fn calendar_year(self) -> i32 {
        BASE_YEAR + i32::from(self.index())
    }
}

/// Which year(s) the monthly comparison shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum YearSelection {
    #[value(name = "2011", alias = "first")]
    First,
    #[value(name = "2012", alias = "second")]
    Second,
    Both,
}

impl YearSelection {
    pub fn years(self) -> &'static [YearIndex] {
        match self {
            YearSelection::First => &[YearIndex::First],
            YearSelection::Second => &[YearIndex::Second],
            YearSelection::Both => &[YearIndex::First, YearIndex::Second],
        }
    }

    pub fn display_name(self) -> String {
        match self {
            YearSelection::First => YearIndex::First.calendar_year().to_string(),
            YearSelection::Second => YearIndex::Second.calendar_year().to_string(),
            YearSelection::Both => "Both".to_string(),
        }
    }

    pub fn next(self) -> Self {
        match self {
            YearSelection::First => YearSelection::Second,
            YearSelection::Second => YearSelection::Both,
            YearSelection::Both => YearSelection::First,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            YearSelection::First => YearSelection::Both,
            YearSelection::Second => YearSelection::First,
            YearSelection::Both => YearSelection::Second,
        }
    }
}

/// What the working-day / holiday totals measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DayTypeMetric {
    /// Count of days carrying the flag (sum of the 0/1 indicator).
    Flags,
    /// Sum of rentals over days carrying the flag.
    Rentals,
}

/// One row of the daily relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub working_day: bool,
    pub holiday: bool,
    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: u8,
    pub year: YearIndex,
    pub rentals: u64,
}

/// One row of the hourly relation.
///
/// Fields are private so the time bucket can never disagree with the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HourlyRow")]
pub struct HourlyRecord {
    date: NaiveDate,
    hour: u8,
    rentals: u64,
    bucket: TimeBucket,
}

impl HourlyRecord {
    pub fn new(date: NaiveDate, hour: u8, rentals: u64) -> Self {
        Self {
            date,
            hour,
            rentals,
            bucket: TimeBucket::from_hour(hour),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn rentals(&self) -> u64 {
        self.rentals
    }

    pub fn bucket(&self) -> TimeBucket {
        self.bucket
    }
}

/// Serialized shape of an hourly record; the bucket is always re-derived.
#[derive(Deserialize)]
struct HourlyRow {
    date: NaiveDate,
    hour: u8,
    rentals: u64,
}

impl From<HourlyRow> for HourlyRecord {
    fn from(row: HourlyRow) -> Self {
        HourlyRecord::new(row.date, row.hour, row.rentals)
    }
}

/// Records that can be filtered by calendar date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for DailyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for HourlyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Working-day and holiday totals for a daily subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayTypeTotals {
    pub working_days_total: u64,
    pub holidays_total: u64,
}

/// Display emphasis derived from an aggregation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Peak,
    Normal,
}

/// A grouped total together with its emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Annotated<K> {
    pub key: K,
    pub value: u64,
    pub emphasis: Emphasis,
}

impl<K> Annotated<K> {
    pub fn is_peak(&self) -> bool {
        self.emphasis == Emphasis::Peak
    }
}

/// The user's choices, consumed by the dashboard pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub bucket: TimeBucket,
    pub years: YearSelection,
    pub day_type_metric: DayTypeMetric,
}

/// Where a dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    /// `http://` / `https://` strings are URLs; anything else is a local path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::Path(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolved data-loading configuration.
///
/// This is derived from CLI flags, environment variables and defaults.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub daily: DataSource,
    pub hourly: DataSource,
    pub timeout_secs: u64,
}

/// A full run's configuration as understood by the front-ends.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data: DataConfig,
    /// Range start; `None` means the earliest date in the daily dataset.
    pub start: Option<NaiveDate>,
    /// Range end; `None` means the latest date in the daily dataset.
    pub end: Option<NaiveDate>,
    pub bucket: TimeBucket,
    pub years: YearSelection,
    pub day_type_metric: DayTypeMetric,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialized_hourly_record_rederives_bucket() {
        let rec: HourlyRecord =
            serde_json::from_str(r#"{"date":"2011-01-01","hour":3,"rentals":5,"bucket":"morning"}"#).unwrap();
        assert_eq!(rec.hour(), 3);
        assert_eq!(rec.bucket(), TimeBucket::Night);
        assert_eq!(rec, HourlyRecord::new(NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(), 3, 5));

        let json = serde_json::to_string(&rec).unwrap();
        let back: HourlyRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn time_bucket_boundaries() {
        assert_eq!(TimeBucket::from_hour(5), TimeBucket::Night);
        assert_eq!(TimeBucket::from_hour(6), TimeBucket::Morning);
        assert_eq!(TimeBucket::from_hour(11), TimeBucket::Morning);
        assert_eq!(TimeBucket::from_hour(12), TimeBucket::Afternoon);
        assert_eq!(TimeBucket::from_hour(17), TimeBucket::Afternoon);
        assert_eq!(TimeBucket::from_hour(18), TimeBucket::Night);
        assert_eq!(TimeBucket::from_hour(0), TimeBucket::Night);
    }

    #[test]
    fn hourly_record_derives_bucket_on_construction() {
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        let rec = HourlyRecord::new(date, 14, 30);
        assert_eq!(rec.bucket(), TimeBucket::Afternoon);
        assert_eq!(rec.hour(), 14);
        assert_eq!(rec.rentals(), 30);
    }

    #[test]
    fn labels_are_bounds_checked() {
        assert_eq!(weekday_label(0), "Sun");
        assert_eq!(weekday_label(6), "Sat");
        assert_eq!(weekday_label(7), "?");
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(12), "Dec");
        assert_eq!(month_label(0), "?");
    }

    #[test]
    fn year_selection_cycles() {
        let mut sel = YearSelection::First;
        for _ in 0..3 {
            sel = sel.next();
        }
        assert_eq!(sel, YearSelection::First);
        assert_eq!(YearSelection::Both.years().len(), 2);
        assert_eq!(YearSelection::Second.display_name(), "2012");
    }

    #[test]
    fn data_source_detects_urls() {
        assert_eq!(
            DataSource::parse("HTTPS://example.com/day.csv"),
            DataSource::Url("HTTPS://example.com/day.csv".to_string())
        );
        assert_eq!(
            DataSource::parse(" data/day.csv "),
            DataSource::Path(PathBuf::from("data/day.csv"))
        );
    }
}
