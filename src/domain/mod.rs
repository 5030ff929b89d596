//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input records (`DailyRecord`, `HourlyRecord`) and derived enums (`TimeBucket`, `YearIndex`)
//! - user choices (`Selection`, `YearSelection`, `DayTypeMetric`)
//! - aggregation outputs (`DayTypeTotals`, `Annotated`)
//! - run configuration (`DashboardConfig`, `DataConfig`, `DataSource`)

pub mod types;

pub use types::*;
