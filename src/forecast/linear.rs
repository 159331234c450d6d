//! Linear trend: OLS line through `(week index, value)`, extrapolated.

use crate::domain::{ForecastMethod, WeeklyPoint};
use crate::error::ForecastError;
use crate::forecast::{ForecastStrategy, Prediction, require_history};
use crate::math::fit_line;

#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrend;

impl ForecastStrategy for LinearTrend {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::Linear
    }

    fn predict(&self, history: &[WeeklyPoint], horizon: usize) -> Result<Prediction, ForecastError> {
        require_history(self.method(), history, 2)?;

        let xs: Vec<f64> = (0..history.len()).map(|i| i as f64).collect();
        let ys: Vec<f64> = history.iter().map(|p| p.value).collect();
        let (intercept, slope) = fit_line(&xs, &ys).ok_or_else(|| ForecastError::ModelFit {
            method: self.method(),
            reason: "least squares solve failed".to_string(),
        })?;
        tracing::debug!(intercept, slope, "linear trend fitted");

        let n = history.len();
        let estimates = (n..n + horizon)
            .map(|i| intercept + slope * i as f64)
            .collect();

        Ok(Prediction {
            estimates,
            bounds: None,
        })
    }
}
