//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw input (`RawTable`, `RawRecord`) and the detected `ColumnBinding`
//! - the weekly series (`WeeklyPoint`) and forecast output (`ForecastPoint`)
//! - run configuration (`ForecastConfig`, `ForecastMethod`)

pub mod types;

pub use types::*;
