//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - summary export (JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
