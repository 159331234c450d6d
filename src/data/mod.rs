//! Synthetic data sources.

pub mod sample;

pub use sample::{SampleSpec, write_sample_csv};
