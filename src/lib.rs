//! `bike-dash` library crate.
//!
//! The binary (`bike-dash`) is a thin wrapper around this library so that:
//!
//! - loading and aggregation are testable without spawning processes
//! - the same pipeline feeds every front-end (TUI, text summary, JSON export)
//! - code stays easy to navigate as the project grows

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
