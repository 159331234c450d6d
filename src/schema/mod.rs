//! Schema detection: which columns hold the order date and the sales value.

pub mod detector;

pub use detector::*;
