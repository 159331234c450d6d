//! Shared pipeline logic used by both CLI and TUI front-ends.
//!
//! Loading and forecasting are two separate steps:
//!
//! ```text
//! load:     csv -> RawTable -> detect columns -> weekly series -> Preview
//! forecast: Preview.series -> strategy -> ForecastRun
//! ```
//!
//! A `Preview` never triggers a forecast, and a failing forecast leaves the
//! preview untouched. The CLI and the TUI only differ in presentation.

use serde::Serialize;
use tracing::info;

use crate::domain::{ChartPoint, ColumnBinding, DatasetStats, ForecastConfig, ForecastMethod, ForecastPoint, RawTable, WeeklyPoint};
use crate::error::{AppError, ForecastError};
use crate::forecast::{Strategy, forecast};
use crate::report::combined_series;

/// Everything derived from one loaded file.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub binding: ColumnBinding,
    pub stats: DatasetStats,
    /// Full weekly history (ascending).
    #[serde(skip)]
    pub series: Vec<WeeklyPoint>,
    /// Trailing weeks shown to the user.
    pub tail: Vec<WeeklyPoint>,
}

/// Output of one forecast trigger.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastRun {
    pub method: ForecastMethod,
    pub points: Vec<ForecastPoint>,
    /// History and forecast in one ascending series, tagged by origin.
    pub chart: Vec<ChartPoint>,
}

/// Load the configured CSV and build its preview.
pub fn load_preview(config: &ForecastConfig) -> Result<Preview, AppError> {
    let table = crate::io::load_table(&config.csv_path)?;
    Ok(preview_table(&table, config.preview_weeks)?)
}

/// Detect columns and aggregate an already-read table.
pub fn preview_table(table: &RawTable, preview_weeks: usize) -> Result<Preview, ForecastError> {
    let binding = crate::schema::detect_columns(&table.headers)?;
    info!(date = %binding.date_column, value = %binding.value_column, "columns detected");

    let weekly = crate::series::build_weekly_series(table, &binding)?;
    let stats = DatasetStats {
        rows_read: table.records.len(),
        rows_used: weekly.rows_used,
        rows_dropped: weekly.rows_dropped,
    };

    let skip = weekly.points.len().saturating_sub(preview_weeks);
    let tail = weekly.points[skip..].to_vec();

    Ok(Preview {
        binding,
        stats,
        series: weekly.points,
        tail,
    })
}

/// Run the configured strategy over a loaded series.
pub fn run_forecast(series: &[WeeklyPoint], config: &ForecastConfig) -> Result<ForecastRun, ForecastError> {
    let strategy = Strategy::for_method(config.method, config.seed);
    let points = forecast(&strategy, series, config.horizon)?;
    let chart = combined_series(series, &points);

    Ok(ForecastRun {
        method: config.method,
        points,
        chart,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::domain::PointOrigin;
    use crate::error::SchemaError;

    /// 20 weeks of daily rows (Mon..Sun), 2500 per week in total.
    fn twenty_weeks_csv() -> String {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut csv = String::from("Row ID,Order Date,Sales\n");
        for day in 0..140 {
            let date = start + Duration::days(day);
            let sales = if day % 7 == 0 { 400.0 } else { 350.0 };
            csv.push_str(&format!("{day},{},{sales}\n", date.format("%d/%m/%Y")));
        }
        csv
    }

    #[test]
    fn end_to_end_preview_then_forecast() {
        crate::logging::init_test();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(twenty_weeks_csv().as_bytes()).unwrap();

        let config = ForecastConfig::new(file.path().to_path_buf(), ForecastMethod::Linear);
        let preview = load_preview(&config).unwrap();

        assert_eq!(preview.binding.date_column, "Order Date");
        assert_eq!(preview.binding.value_column, "Sales");
        assert_eq!(preview.series.len(), 20);
        let total: f64 = preview.series.iter().map(|p| p.value).sum();
        assert!((total - 50_000.0).abs() < 1e-6);
        assert_eq!(preview.tail.len(), 10);
        assert_eq!(preview.tail.last(), preview.series.last());
        assert_eq!(preview.stats.rows_read, 140);
        assert_eq!(preview.stats.rows_dropped, 0);

        let run = run_forecast(&preview.series, &config).unwrap();
        assert_eq!(run.points.len(), 8);
        let last = preview.series[19].week_start;
        for (i, p) in run.points.iter().enumerate() {
            assert_eq!(p.period_start, last + Duration::weeks(i as i64 + 1));
        }
        assert_eq!(run.chart.len(), 28);
        assert_eq!(run.chart[19].origin, PointOrigin::Historical);
        assert_eq!(run.chart[20].origin, PointOrigin::Forecast);
    }

    #[test]
    fn unknown_headers_fail_before_aggregation() {
        let csv = "TxnDate,Amt\n2024-01-01,5\n";
        let table = crate::io::read_table(csv.as_bytes()).unwrap();
        let err = preview_table(&table, 10).unwrap_err();
        assert_eq!(err, ForecastError::Schema(SchemaError::NoDateColumn));
    }

    #[test]
    fn seasonal_on_three_weeks_is_insufficient() {
        let csv = "Date,Sales\n2024-01-01,1\n2024-01-08,2\n2024-01-15,3\n";
        let table = crate::io::read_table(csv.as_bytes()).unwrap();
        let preview = preview_table(&table, 10).unwrap();
        assert_eq!(preview.tail.len(), 3);

        let config = ForecastConfig::new("unused.csv".into(), ForecastMethod::Seasonal);
        let err = run_forecast(&preview.series, &config).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientHistory {
                required: 8,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn undecodable_sales_cell_fails_instead_of_vanishing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Date,Sales\n2024-01-01,10\n2024-01-02,\xff\xfe\n2024-01-03,5\n")
            .unwrap();

        let config = ForecastConfig::new(file.path().to_path_buf(), ForecastMethod::Linear);
        let err = load_preview(&config).unwrap_err();
        assert_eq!(err.exit_code(), 3);

        let table = crate::io::load_table(file.path()).unwrap();
        let err = preview_table(&table, 10).unwrap_err();
        match err {
            ForecastError::InvalidValue { line, column, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "Sales");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_maps_to_input_error() {
        let config = ForecastConfig::new("/no/such/sales.csv".into(), ForecastMethod::Linear);
        assert_eq!(load_preview(&config).unwrap_err().exit_code(), 2);
    }
}
