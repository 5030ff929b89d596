//! Plotting utilities.
//!
//! The plain-text summary renders charts with characters only, so it works in
//! pipes and CI logs. The interactive charts live in `crate::tui`.

pub mod ascii;

pub use ascii::*;
