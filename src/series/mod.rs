//! Series building: date normalization and weekly aggregation.

pub mod builder;
pub mod dates;

pub use builder::*;
pub use dates::*;
