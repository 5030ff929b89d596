//! CSV ingest and normalization.
//!
//! This module turns the raw daily/hourly bike-sharing CSVs into typed
//! records that are safe to aggregate.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (rows keep file order)
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;
use std::io::Read;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::warn;

use crate::domain::{DailyRecord, HourlyRecord, YearIndex};
use crate::error::AppError;

const DAILY_COLUMNS: [&str; 6] = ["dteday", "yr", "holiday", "weekday", "workingday", "cnt"];
const HOURLY_COLUMNS: [&str; 3] = ["dteday", "hr", "cnt"];

/// At most this many skipped rows are logged individually per file.
const MAX_LOGGED_ROW_ERRORS: usize = 5;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: typed records + row errors.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub records: Vec<T>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl<T> Ingested<T> {
    pub fn rows_used(&self) -> usize {
        self.records.len()
    }
}

type HeaderMap = HashMap<String, usize>;

/// Parse the daily relation (`day.csv`).
pub fn parse_daily<R: Read>(reader: R, source: &str) -> Result<Ingested<DailyRecord>, AppError> {
    read_rows(reader, source, &DAILY_COLUMNS, parse_daily_row)
}

/// Parse the hourly relation (`hour.csv`).
pub fn parse_hourly<R: Read>(reader: R, source: &str) -> Result<Ingested<HourlyRecord>, AppError> {
    read_rows(reader, source, &HOURLY_COLUMNS, parse_hourly_row)
}

fn read_rows<R, T, F>(reader: R, source: &str, required: &[&str], parse: F) -> Result<Ingested<T>, AppError>
where
    R: Read,
    F: Fn(&StringRecord, &HeaderMap) -> Result<T, String>,
{
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers from '{source}': {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(source, required, &header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        rows_read += 1;

        // Reader positions count physical lines, so quoted multi-line fields stay accurate.
        // Row index + 2 (header line, 1-based) is the fallback when no position is known.
        let (line, outcome) = match result {
            Ok(record) => (
                record.position().map_or(idx + 2, |p| p.line() as usize),
                parse(&record, &header_map),
            ),
            Err(e) => (
                e.position().map_or(idx + 2, |p| p.line() as usize),
                Err(format!("CSV parse error: {e}")),
            ),
        };

        match outcome {
            Ok(rec) => records.push(rec),
            Err(message) => {
                if row_errors.len() < MAX_LOGGED_ROW_ERRORS {
                    warn!(source, line, %message, "skipping row");
                }
                row_errors.push(RowError { line, message });
            }
        }
    }

    if records.is_empty() {
        return Err(AppError::no_data(format!(
            "No valid rows in '{source}' ({rows_read} read, {} rejected).",
            row_errors.len()
        )));
    }

    Ok(Ingested {
        records,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HeaderMap {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(source: &str, required: &[&str], header_map: &HeaderMap) -> Result<(), AppError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|col| !header_map.contains_key(*col))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::input(format!(
        "Missing required column(s) in '{source}': {}",
        missing
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

fn parse_daily_row(record: &StringRecord, header_map: &HeaderMap) -> Result<DailyRecord, String> {
    let date = parse_date(get_required(record, header_map, "dteday")?)?;
    let year_raw = parse_int(get_required(record, header_map, "yr")?, "yr", 1)?;
    let year = YearIndex::from_index(year_raw as u8)
        .ok_or_else(|| format!("Invalid `yr` value {year_raw} (expected 0 or 1)."))?;
    let holiday = parse_flag(get_required(record, header_map, "holiday")?, "holiday")?;
    let weekday = parse_int(get_required(record, header_map, "weekday")?, "weekday", 6)? as u8;
    let working_day = parse_flag(get_required(record, header_map, "workingday")?, "workingday")?;
    let rentals = parse_count(get_required(record, header_map, "cnt")?)?;

    Ok(DailyRecord {
        date,
        working_day,
        holiday,
        weekday,
        year,
        rentals,
    })
}

fn parse_hourly_row(record: &StringRecord, header_map: &HeaderMap) -> Result<HourlyRecord, String> {
    let date = parse_date(get_required(record, header_map, "dteday")?)?;
    let hour = parse_int(get_required(record, header_map, "hr")?, "hr", 23)? as u8;
    let rentals = parse_count(get_required(record, header_map, "cnt")?)?;
    Ok(HourlyRecord::new(date, hour, rentals))
}

fn get_required<'a>(record: &'a StringRecord, header_map: &HeaderMap, name: &str) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // ISO dates are what the published dataset uses; the other formats show up
    // when the files have been round-tripped through a spreadsheet.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, DD/MM/YYYY, DD-MM-YYYY."
    ))
}

fn parse_int(s: &str, name: &str, max: u64) -> Result<u64, String> {
    let v = s
        .parse::<u64>()
        .map_err(|_| format!("Invalid `{name}` value '{s}' (expected an integer in 0..={max})."))?;
    if v > max {
        return Err(format!("Out-of-range `{name}` value {v} (expected 0..={max})."));
    }
    Ok(v)
}

fn parse_flag(s: &str, name: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(format!("Invalid `{name}` flag '{s}' (expected 0/1 or true/false).")),
    }
}

fn parse_count(s: &str) -> Result<u64, String> {
    s.parse::<u64>()
        .map_err(|_| format!("Invalid `cnt` value '{s}' (expected a non-negative integer)."))
}
