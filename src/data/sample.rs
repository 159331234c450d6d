//! Synthetic daily sales for demos and manual testing.
//!
//! Each day's sales are
//!
//! ```text
//! sales(d) = base · (1 + growth · week(d)) · season(week(d) mod 4) · weekday(d) + ε,  ε ~ N(0, σ)
//! ```
//!
//! clamped at zero and rounded to cents. The 4-week season lines up with the
//! seasonal smoothing strategy, so every method has something to find.

use std::io::Write;

use chrono::{Datelike, Duration, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::error::AppError;

const BASE_DAILY_SALES: f64 = 350.0;
const WEEKLY_GROWTH: f64 = 0.01;
const NOISE_SD: f64 = 25.0;
const SEASON: [f64; 4] = [0.9, 1.0, 1.2, 0.95];
/// Monday..Sunday multipliers.
const WEEKDAY: [f64; 7] = [0.9, 0.95, 1.0, 1.0, 1.1, 1.25, 0.8];

/// Parameters for [`write_sample_csv`].
#[derive(Debug, Clone, Copy)]
pub struct SampleSpec {
    pub start: NaiveDate,
    pub weeks: usize,
    pub seed: u64,
}

/// Write `7 · weeks` daily rows (`Order Date` as DD/MM/YYYY, `Sales`).
///
/// Returns the number of data rows written.
pub fn write_sample_csv<W: Write>(spec: SampleSpec, out: W) -> Result<usize, AppError> {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let noise = Normal::new(0.0, NOISE_SD).map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut writer = csv::Writer::from_writer(out);
    let io_err = |e: csv::Error| AppError::new(4, format!("Failed to write sample CSV: {e}"));

    writer.write_record(["Order Date", "Sales"]).map_err(io_err)?;

    let days = spec.weeks * 7;
    for day in 0..days {
        let date = spec.start + Duration::days(day as i64);
        let week = day / 7;
        let level = BASE_DAILY_SALES * (1.0 + WEEKLY_GROWTH * week as f64);
        let expected = level * SEASON[week % SEASON.len()] * WEEKDAY[date.weekday().num_days_from_monday() as usize];
        let sales = (expected + noise.sample(&mut rng)).max(0.0);

        writer
            .write_record([date.format("%d/%m/%Y").to_string(), format!("{sales:.2}")])
            .map_err(io_err)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to write sample CSV: {e}")))?;
    Ok(days)
}
