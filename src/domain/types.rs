//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between pipeline stages by value
//! - printed as JSON (`--format json`)
//! - rendered by the terminal front-ends

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Number of future weeks every forecast produces.
pub const FORECAST_HORIZON: usize = 8;

/// Number of trailing weeks shown in the preview.
pub const PREVIEW_WEEKS: usize = 10;

/// Which forecasting strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMethod {
    /// Ordinary least squares trend line.
    Linear,
    /// Additive Holt–Winters smoothing with a 4-week season.
    Seasonal,
    /// Changepoint trend + yearly seasonality with uncertainty bounds.
    Decomposable,
}

impl ForecastMethod {
    pub const ALL: [ForecastMethod; 3] = [
        ForecastMethod::Linear,
        ForecastMethod::Seasonal,
        ForecastMethod::Decomposable,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ForecastMethod::Linear => "Linear trend",
            ForecastMethod::Seasonal => "Seasonal smoothing",
            ForecastMethod::Decomposable => "Decomposable model",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ForecastMethod::Linear => ForecastMethod::Seasonal,
            ForecastMethod::Seasonal => ForecastMethod::Decomposable,
            ForecastMethod::Decomposable => ForecastMethod::Linear,
        }
    }
}

impl std::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// One input row, as raw strings aligned with [`RawTable::headers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number in the source file (header is line 1).
    pub line: usize,
    pub fields: Vec<String>,
}

/// A loaded table: header row plus every record, never mutated after load.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
    index: HashMap<String, usize>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, records: Vec<RawRecord>) -> Self {
        let mut index = HashMap::with_capacity(headers.len());
        for (idx, name) in headers.iter().enumerate() {
            // First occurrence wins for duplicated header names.
            index.entry(name.clone()).or_insert(idx);
        }
        Self {
            headers,
            records,
            index,
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Raw cell for `column` in `record` (trimmed, `None` when missing or empty).
    pub fn value<'a>(&self, record: &'a RawRecord, column: &str) -> Option<&'a str> {
        let idx = self.column_index(column)?;
        record
            .fields
            .get(idx)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

/// Detected date/value columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnBinding {
    pub date_column: String,
    pub value_column: String,
    /// The value column counts units rather than money.
    pub is_quantity: bool,
}

impl ColumnBinding {
    pub fn value_label(&self) -> &'static str {
        if self.is_quantity { "Units" } else { "Sales ($)" }
    }
}

/// One aggregated week of history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPoint {
    /// Monday of the ISO week.
    pub week_start: NaiveDate,
    pub value: f64,
}

/// One forecast week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period_start: NaiveDate,
    pub estimate: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Where a chart point comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointOrigin {
    Historical,
    Forecast,
}

/// Combined history + forecast point used for charting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub origin: PointOrigin,
}

/// Row accounting for one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetStats {
    pub rows_read: usize,
    pub rows_used: usize,
    /// Rows dropped because their date did not parse.
    pub rows_dropped: usize,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and `.env`).
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub csv_path: PathBuf,
    pub method: ForecastMethod,
    pub horizon: usize,
    pub preview_weeks: usize,
    /// Seed for simulated uncertainty intervals.
    pub seed: u64,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub format: OutputFormat,
}

impl ForecastConfig {
    pub fn new(csv_path: PathBuf, method: ForecastMethod) -> Self {
        Self {
            csv_path,
            method,
            horizon: FORECAST_HORIZON,
            preview_weeks: PREVIEW_WEEKS,
            seed: 42,
            plot: true,
            plot_width: 80,
            plot_height: 20,
            format: OutputFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_value_trims_and_skips_empty() {
        let table = RawTable::new(
            vec!["Order Date".to_string(), "Sales".to_string()],
            vec![RawRecord {
                line: 2,
                fields: vec![" 01/02/2024 ".to_string(), "  ".to_string()],
            }],
        );
        let rec = &table.records[0];
        assert_eq!(table.value(rec, "Order Date"), Some("01/02/2024"));
        assert_eq!(table.value(rec, "Sales"), None);
        assert_eq!(table.value(rec, "Missing"), None);
    }

    #[test]
    fn method_cycle_visits_all() {
        let mut m = ForecastMethod::Linear;
        for _ in 0..ForecastMethod::ALL.len() {
            m = m.next();
        }
        assert_eq!(m, ForecastMethod::Linear);
    }
}
