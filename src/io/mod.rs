//! Input helpers.
//!
//! - CSV ingest into a raw table (`ingest`)

pub mod ingest;

pub use ingest::*;
