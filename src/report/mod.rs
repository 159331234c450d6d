//! Reporting utilities: chart series and formatted terminal output.

use crate::domain::{ChartPoint, ForecastPoint, PointOrigin, WeeklyPoint};

pub mod format;

pub use format::*;

/// History followed by forecast, tagged by origin, in date order.
pub fn combined_series(history: &[WeeklyPoint], forecast: &[ForecastPoint]) -> Vec<ChartPoint> {
    let past = history.iter().map(|p| ChartPoint {
        date: p.week_start,
        value: p.value,
        origin: PointOrigin::Historical,
    });
    let future = forecast.iter().map(|p| ChartPoint {
        date: p.period_start,
        value: p.estimate,
        origin: PointOrigin::Forecast,
    });
    past.chain(future).collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn combined_series_tags_origin() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let history = vec![
            WeeklyPoint { week_start: d(1), value: 10.0 },
            WeeklyPoint { week_start: d(8), value: 12.0 },
        ];
        let forecast = vec![ForecastPoint {
            period_start: d(15),
            estimate: 14.0,
            lower: None,
            upper: None,
        }];

        let chart = combined_series(&history, &forecast);
        assert_eq!(chart.len(), 3);
        assert_eq!(chart[1].origin, PointOrigin::Historical);
        assert_eq!(chart[2].origin, PointOrigin::Forecast);
        assert_eq!(chart[2].value, 14.0);
        assert!(chart.windows(2).all(|w| w[0].date < w[1].date));
    }
}
