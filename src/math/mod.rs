//! Mathematical utilities: regression bases and least squares.

pub mod basis;
pub mod ols;

pub use basis::*;
pub use ols::*;
