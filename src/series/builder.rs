//! Weekly aggregation of raw sales rows.
//!
//! Row policy:
//! - rows whose date does not parse are dropped (and counted)
//! - rows with a parseable date but a non-numeric value fail the whole build,
//!   since silently coercing them would misstate the totals
//! - zero surviving rows is an error, not an empty series

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::{ColumnBinding, RawTable, WeeklyPoint};
use crate::error::ForecastError;
use crate::series::dates::{parse_date, week_start};

/// Build output: the weekly series plus row accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySeries {
    pub points: Vec<WeeklyPoint>,
    pub rows_used: usize,
    pub rows_dropped: usize,
}

/// Parse, bucket and sum `table` into an ascending weekly series.
pub fn build_weekly_series(table: &RawTable, binding: &ColumnBinding) -> Result<WeeklySeries, ForecastError> {
    let mut dated = Vec::with_capacity(table.records.len());
    let mut rows_dropped = 0usize;

    for record in &table.records {
        let Some(date) = table.value(record, &binding.date_column).and_then(parse_date) else {
            rows_dropped += 1;
            continue;
        };

        let raw = table.value(record, &binding.value_column).unwrap_or("");
        let value = parse_value(raw).ok_or_else(|| ForecastError::InvalidValue {
            line: record.line,
            column: binding.value_column.clone(),
            value: raw.to_string(),
        })?;

        dated.push((date, value));
    }

    if dated.is_empty() {
        return Err(ForecastError::EmptyAfterParse {
            rows_read: table.records.len(),
        });
    }
    if rows_dropped > 0 {
        warn!(rows_dropped, column = %binding.date_column, "dropped rows with unparseable dates");
    }

    let rows_used = dated.len();
    let points = aggregate_weekly(dated);
    debug!(weeks = points.len(), rows_used, "built weekly series");

    Ok(WeeklySeries {
        points,
        rows_used,
        rows_dropped,
    })
}

/// Sum dated values into Monday-start weekly buckets, sorted by week.
pub fn aggregate_weekly<I>(dated: I) -> Vec<WeeklyPoint>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, value) in dated {
        *buckets.entry(week_start(date)).or_insert(0.0) += value;
    }
    buckets
        .into_iter()
        .map(|(week_start, value)| WeeklyPoint { week_start, value })
        .collect()
}

fn parse_value(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRecord;

    fn binding() -> ColumnBinding {
        ColumnBinding {
            date_column: "Order Date".to_string(),
            value_column: "Sales".to_string(),
            is_quantity: false,
        }
    }

    fn table(rows: &[(&str, &str)]) -> RawTable {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, (d, v))| RawRecord {
                line: i + 2,
                fields: vec![d.to_string(), v.to_string()],
            })
            .collect();
        RawTable::new(vec!["Order Date".to_string(), "Sales".to_string()], records)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sums_per_week_and_sorts() {
        let t = table(&[
            ("13/03/2024", "5"),  // Wed, week of 11 Mar
            ("04/03/2024", "10"), // Mon, week of 4 Mar
            ("10/03/2024", "2.5"), // Sun, week of 4 Mar
            ("11/03/2024", "1"),  // Mon, week of 11 Mar
        ]);
        let series = build_weekly_series(&t, &binding()).unwrap();
        assert_eq!(
            series.points,
            vec![
                WeeklyPoint { week_start: ymd(2024, 3, 4), value: 12.5 },
                WeeklyPoint { week_start: ymd(2024, 3, 11), value: 6.0 },
            ]
        );
        assert_eq!(series.rows_used, 4);
        assert_eq!(series.rows_dropped, 0);
    }

    #[test]
    fn drops_bad_dates_silently() {
        let t = table(&[("garbage", "100"), ("04/03/2024", "10"), ("", "7")]);
        let series = build_weekly_series(&t, &binding()).unwrap();
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.rows_dropped, 2);
        assert!((series.points[0].value - 10.0).abs() < 1e-12);
    }

    #[test]
    fn all_dates_bad_is_an_error() {
        let t = table(&[("nope", "1"), ("13/13/2024", "2")]);
        let err = build_weekly_series(&t, &binding()).unwrap_err();
        assert_eq!(err, ForecastError::EmptyAfterParse { rows_read: 2 });
    }

    #[test]
    fn non_numeric_value_is_surfaced() {
        let t = table(&[("04/03/2024", "10"), ("05/03/2024", "$12")]);
        let err = build_weekly_series(&t, &binding()).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InvalidValue {
                line: 3,
                column: "Sales".to_string(),
                value: "$12".to_string(),
            }
        );
    }

    #[test]
    fn conserves_total() {
        let rows: Vec<(String, String)> = (0..60)
            .map(|i| {
                let d = ymd(2024, 1, 1) + chrono::Duration::days(i * 2);
                (d.format("%d/%m/%Y").to_string(), format!("{}", 10 + i))
            })
            .collect();
        let borrowed: Vec<(&str, &str)> = rows.iter().map(|(d, v)| (d.as_str(), v.as_str())).collect();
        let series = build_weekly_series(&table(&borrowed), &binding()).unwrap();

        let input_total: f64 = (0..60).map(|i| (10 + i) as f64).sum();
        let weekly_total: f64 = series.points.iter().map(|p| p.value).sum();
        assert!((input_total - weekly_total).abs() < 1e-9);
        // Days 0..=118 from a Monday fall into 17 ISO weeks.
        assert_eq!(series.points.len(), 17);
        assert!(series.points.windows(2).all(|w| w[0].week_start < w[1].week_start));
    }

    #[test]
    fn rebuilding_weekly_output_is_idempotent() {
        let t = table(&[("04/03/2024", "3"), ("06/03/2024", "4"), ("20/03/2024", "9")]);
        let first = build_weekly_series(&t, &binding()).unwrap().points;

        let rows: Vec<(String, String)> = first
            .iter()
            .map(|p| (p.week_start.format("%Y-%m-%d").to_string(), p.value.to_string()))
            .collect();
        let rows: Vec<(&str, &str)> = rows.iter().map(|(d, v)| (d.as_str(), v.as_str())).collect();
        let again = build_weekly_series(&table(&rows), &binding()).unwrap();

        assert_eq!(again.points, first);
        assert_eq!(again.rows_used, first.len());
        assert_eq!(again.rows_dropped, 0);
    }
}
