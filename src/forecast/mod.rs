//! Forecast strategies.
//!
//! Every strategy answers the same question: given a weekly history, what are
//! the next `horizon` weekly values? Strategies only produce numbers; this
//! module owns the calendar, so all of them continue the history with the same
//! contiguous run of weeks:
//!
//! ```text
//! period_start[i] = last_week_start + 7 * (i + 1) days
//! ```
//!
//! Selection happens through [`ForecastMethod`] (configuration), never by
//! inspecting the data.

use tracing::{debug, info};

use crate::domain::{ForecastMethod, ForecastPoint, WeeklyPoint};
use crate::error::ForecastError;
use crate::series::weeks_after;

pub mod decomposable;
pub mod holt_winters;
pub mod linear;

pub use decomposable::DecomposableModel;
pub use holt_winters::HoltWinters;
pub use linear::LinearTrend;

/// Raw strategy output, aligned with the forecast weeks.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub estimates: Vec<f64>,
    /// `(lower, upper)` per week, for strategies that quantify uncertainty.
    pub bounds: Option<Vec<(f64, f64)>>,
}

/// A forecasting method.
pub trait ForecastStrategy {
    fn method(&self) -> ForecastMethod;

    /// Predict `horizon` values following `history` (ascending, non-empty
    /// checks are the strategy's responsibility).
    fn predict(&self, history: &[WeeklyPoint], horizon: usize) -> Result<Prediction, ForecastError>;
}

/// Configured strategy, dispatched statically by method.
#[derive(Debug, Clone)]
pub enum Strategy {
    Linear(LinearTrend),
    Seasonal(HoltWinters),
    Decomposable(DecomposableModel),
}

impl Strategy {
    pub fn for_method(method: ForecastMethod, seed: u64) -> Self {
        match method {
            ForecastMethod::Linear => Strategy::Linear(LinearTrend),
            ForecastMethod::Seasonal => Strategy::Seasonal(HoltWinters::default()),
            ForecastMethod::Decomposable => Strategy::Decomposable(DecomposableModel::with_seed(seed)),
        }
    }
}

impl ForecastStrategy for Strategy {
    fn method(&self) -> ForecastMethod {
        match self {
            Strategy::Linear(s) => s.method(),
            Strategy::Seasonal(s) => s.method(),
            Strategy::Decomposable(s) => s.method(),
        }
    }

    fn predict(&self, history: &[WeeklyPoint], horizon: usize) -> Result<Prediction, ForecastError> {
        match self {
            Strategy::Linear(s) => s.predict(history, horizon),
            Strategy::Seasonal(s) => s.predict(history, horizon),
            Strategy::Decomposable(s) => s.predict(history, horizon),
        }
    }
}

/// Run `strategy` on `history` and attach the forecast weeks.
pub fn forecast<S: ForecastStrategy>(
    strategy: &S,
    history: &[WeeklyPoint],
    horizon: usize,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    if horizon == 0 {
        return Err(ForecastError::InvalidHorizon);
    }

    let method = strategy.method();
    info!(%method, weeks = history.len(), horizon, "running forecast");
    let prediction = strategy.predict(history, horizon)?;

    // A strategy returning the wrong shape is a bug, but report it as a fit
    // failure rather than emitting a partial forecast.
    if prediction.estimates.len() != horizon
        || prediction.bounds.as_ref().is_some_and(|b| b.len() != horizon)
    {
        return Err(ForecastError::ModelFit {
            method,
            reason: format!("expected {horizon} predictions, got {}", prediction.estimates.len()),
        });
    }
    if prediction.estimates.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::ModelFit {
            method,
            reason: "non-finite prediction".to_string(),
        });
    }

    let Some(last) = history.last() else {
        return Err(ForecastError::InsufficientHistory {
            method,
            required: 1,
            actual: 0,
        });
    };

    let points: Vec<ForecastPoint> = prediction
        .estimates
        .iter()
        .enumerate()
        .map(|(i, &estimate)| {
            let (lower, upper) = match &prediction.bounds {
                Some(b) => (Some(b[i].0), Some(b[i].1)),
                None => (None, None),
            };
            ForecastPoint {
                period_start: weeks_after(last.week_start, i + 1),
                estimate,
                lower,
                upper,
            }
        })
        .collect();

    debug!(first = %points[0].period_start, "forecast ready");
    Ok(points)
}

pub(crate) fn require_history(
    method: ForecastMethod,
    history: &[WeeklyPoint],
    required: usize,
) -> Result<(), ForecastError> {
    if history.len() < required {
        return Err(ForecastError::InsufficientHistory {
            method,
            required,
            actual: history.len(),
        });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::test_support::weekly;
    use super::*;

    #[test]
    fn forecast_weeks_continue_history() {
        let history = weekly(&[10.0, 12.0, 11.0, 15.0, 14.0]);
        for method in ForecastMethod::ALL {
            if method == ForecastMethod::Seasonal {
                continue;
            }
            let strategy = Strategy::for_method(method, 7);
            for h in [1, 3, 8] {
                let out = forecast(&strategy, &history, h).unwrap();
                assert_eq!(out.len(), h, "{method}");
                let last = history.last().unwrap().week_start;
                assert_eq!(out[0].period_start, last + Duration::days(7));
                assert!(out.windows(2).all(|w| w[1].period_start - w[0].period_start == Duration::days(7)));
            }
        }
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let history = weekly(&[1.0, 2.0]);
        let err = forecast(&Strategy::for_method(ForecastMethod::Linear, 0), &history, 0).unwrap_err();
        assert_eq!(err, ForecastError::InvalidHorizon);
    }

    #[test]
    fn only_decomposable_reports_bounds() {
        let history = weekly(&[5.0, 6.0, 7.0, 8.0, 9.0, 8.0, 9.0, 10.0, 11.0]);
        for method in ForecastMethod::ALL {
            let out = forecast(&Strategy::for_method(method, 1), &history, 4).unwrap();
            let has_bounds = out.iter().all(|p| p.lower.is_some() && p.upper.is_some());
            assert_eq!(has_bounds, method == ForecastMethod::Decomposable, "{method}");
        }
    }
}
