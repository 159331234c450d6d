//! `salescast` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - the load → aggregate → forecast pipeline is testable without spawning processes
//! - the CLI and the TUI share one implementation of it

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
pub mod schema;
pub mod series;
pub mod tui;
