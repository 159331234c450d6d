//! Decomposable trend + seasonality model with uncertainty intervals.
//!
//! ```text
//! y(t) = m + k·t + Σ_j δ_j·max(0, t - s_j) + seasonality(t) + ε
//! ```
//!
//! The trend is piecewise linear: each changepoint `s_j` (spread over the first
//! 80% of history) changes the slope by `δ_j`. Yearly seasonality (Fourier order 10) is added only
//! once two full years of weeks are available.
//!
//! Fitting:
//! - time is scaled to `[0, 1]` over the history, values by their max |y|
//! - coefficients come from ridge least squares (changepoint and seasonal
//!   columns penalized, intercept and base slope free)
//!
//! Uncertainty: future slope changes are simulated (they occur at the
//! historical changepoint rate, with Laplace-distributed size matching the
//! fitted `|δ|`), plus Gaussian noise at the in-sample residual scale. Bounds
//! are the 10th/90th percentiles of the simulated paths (80% interval). The
//! simulation is seeded, so a given input and seed always give the same bounds.

use nalgebra::{DMatrix, DVector};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Exp, Normal};
use tracing::debug;

use crate::domain::{ForecastMethod, WeeklyPoint};
use crate::error::ForecastError;
use crate::forecast::{ForecastStrategy, Prediction};
use crate::math::{YEAR_DAYS, changepoint_grid, fill_fourier_terms, hinge, solve_ridge};

const MAX_CHANGEPOINTS: usize = 25;
const CHANGEPOINT_RANGE: f64 = 0.8;
const CHANGEPOINT_PENALTY: f64 = 1.0;
const YEARLY_ORDER: usize = 10;
const SEASONALITY_PENALTY: f64 = 0.1;
/// History span (days) required before yearly seasonality is fitted.
const YEARLY_MIN_SPAN_DAYS: f64 = 2.0 * 365.0;
const INTERVAL_WIDTH: f64 = 0.8;
const UNCERTAINTY_SAMPLES: usize = 1000;

#[derive(Debug, Clone)]
pub struct DecomposableModel {
    pub seed: u64,
    pub samples: usize,
}

impl DecomposableModel {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            samples: UNCERTAINTY_SAMPLES,
        }
    }

    fn fit_error(&self, reason: impl Into<String>) -> ForecastError {
        ForecastError::ModelFit {
            method: self.method(),
            reason: reason.into(),
        }
    }
}

/// Fitted model in scaled units.
#[derive(Debug, Clone)]
struct Fit {
    /// Days from first observation to last.
    t_span: f64,
    y_scale: f64,
    /// Scaled changepoint locations.
    changepoints: Vec<f64>,
    yearly: bool,
    beta: DVector<f64>,
    sigma: f64,
}

impl Fit {
    fn columns(&self) -> usize {
        2 + self.changepoints.len() + if self.yearly { 2 * YEARLY_ORDER } else { 0 }
    }

    /// Design row at `days` since the first observation.
    fn row(&self, days: f64, out: &mut [f64]) {
        let t = days / self.t_span;
        out[0] = 1.0;
        out[1] = t;
        for (j, &s) in self.changepoints.iter().enumerate() {
            out[2 + j] = hinge(t, s);
        }
        if self.yearly {
            let off = 2 + self.changepoints.len();
            fill_fourier_terms(days, YEAR_DAYS, YEARLY_ORDER, &mut out[off..]);
        }
    }

    fn predict_scaled(&self, days: f64) -> f64 {
        let mut row = vec![0.0; self.columns()];
        self.row(days, &mut row);
        row.iter().zip(self.beta.iter()).map(|(x, b)| x * b).sum()
    }

    fn deltas(&self) -> &[f64] {
        &self.beta.as_slice()[2..2 + self.changepoints.len()]
    }
}

impl DecomposableModel {
    fn fit(&self, history: &[WeeklyPoint]) -> Result<Fit, ForecastError> {
        if history.len() < 2 {
            return Err(self.fit_error(format!(
                "needs at least 2 weekly points, got {}",
                history.len()
            )));
        }
        if history.iter().any(|p| !p.value.is_finite()) {
            return Err(self.fit_error("history contains non-finite values"));
        }

        let origin = history[0].week_start;
        let days: Vec<f64> = history
            .iter()
            .map(|p| (p.week_start - origin).num_days() as f64)
            .collect();
        let t_span = days[days.len() - 1];
        if t_span <= 0.0 {
            return Err(self.fit_error("history spans zero days"));
        }
        let ts: Vec<f64> = days.iter().map(|d| d / t_span).collect();

        let max_abs = history.iter().map(|p| p.value.abs()).fold(0.0, f64::max);
        let y_scale = if max_abs > 0.0 { max_abs } else { 1.0 };
        let ys: Vec<f64> = history.iter().map(|p| p.value / y_scale).collect();

        let changepoints = changepoint_grid(&ts, MAX_CHANGEPOINTS, CHANGEPOINT_RANGE);
        let yearly = t_span >= YEARLY_MIN_SPAN_DAYS;

        let mut fit = Fit {
            t_span,
            y_scale,
            changepoints,
            yearly,
            beta: DVector::zeros(0),
            sigma: 0.0,
        };

        let p = fit.columns();
        let n = history.len();
        let mut design = DMatrix::<f64>::zeros(n, p);
        let mut row = vec![0.0; p];
        for (i, &d) in days.iter().enumerate() {
            fit.row(d, &mut row);
            for (j, &v) in row.iter().enumerate() {
                design[(i, j)] = v;
            }
        }

        let mut penalties = vec![0.0; p];
        for (j, pen) in penalties.iter_mut().enumerate().skip(2) {
            *pen = if j < 2 + fit.changepoints.len() {
                CHANGEPOINT_PENALTY
            } else {
                SEASONALITY_PENALTY
            };
        }

        let y = DVector::from_column_slice(&ys);
        fit.beta = solve_ridge(&design, &y, &penalties)
            .ok_or_else(|| self.fit_error("least squares did not converge"))?;

        let fitted = &design * &fit.beta;
        let sse: f64 = fitted.iter().zip(ys.iter()).map(|(f, y)| (y - f).powi(2)).sum();
        fit.sigma = (sse / n as f64).sqrt();
        if !fit.sigma.is_finite() {
            return Err(self.fit_error("non-finite residual scale"));
        }

        debug!(
            changepoints = fit.changepoints.len(),
            yearly = fit.yearly,
            sigma = fit.sigma * fit.y_scale,
            "decomposable model fitted"
        );
        Ok(fit)
    }

    /// Simulated `(lower, upper)` per future step, in scaled units.
    fn simulate_bounds(&self, fit: &Fit, future_days: &[f64], yhat: &[f64]) -> Result<Vec<(f64, f64)>, ForecastError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let noise = Normal::new(0.0, fit.sigma).map_err(|e| self.fit_error(format!("noise distribution: {e}")))?;

        let deltas = fit.deltas();
        let mean_abs_delta = if deltas.is_empty() {
            0.0
        } else {
            deltas.iter().map(|d| d.abs()).sum::<f64>() / deltas.len() as f64
        };
        // Historical changepoints per unit of scaled time.
        let rate = fit.changepoints.len() as f64;
        let jump = if mean_abs_delta > 0.0 {
            Some(Exp::new(1.0 / mean_abs_delta).map_err(|e| self.fit_error(format!("trend distribution: {e}")))?)
        } else {
            None
        };

        let steps = future_days.len();
        let samples = self.samples.max(1);
        let mut paths = vec![Vec::with_capacity(samples); steps];

        for _ in 0..samples {
            let mut slope_dev = 0.0;
            let mut level_dev = 0.0;
            let mut prev_t = 1.0;
            for (h, &d) in future_days.iter().enumerate() {
                let t = d / fit.t_span;
                let dt = t - prev_t;
                prev_t = t;

                if let Some(jump) = &jump {
                    if rng.gen_bool((rate * dt).clamp(0.0, 1.0)) {
                        let size: f64 = jump.sample(&mut rng);
                        slope_dev += if rng.gen_bool(0.5) { size } else { -size };
                    }
                }
                level_dev += slope_dev * dt;
                paths[h].push(yhat[h] + level_dev + noise.sample(&mut rng));
            }
        }

        let lo_q = (1.0 - INTERVAL_WIDTH) / 2.0;
        let hi_q = 1.0 - lo_q;
        Ok(paths
            .iter_mut()
            .zip(yhat.iter())
            .map(|(samples, &est)| {
                samples.sort_by(f64::total_cmp);
                (quantile(samples, lo_q).min(est), quantile(samples, hi_q).max(est))
            })
            .collect())
    }
}

impl ForecastStrategy for DecomposableModel {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::Decomposable
    }

    fn predict(&self, history: &[WeeklyPoint], horizon: usize) -> Result<Prediction, ForecastError> {
        let fit = self.fit(history)?;

        let last_days = fit.t_span;
        let future_days: Vec<f64> = (1..=horizon).map(|h| last_days + 7.0 * h as f64).collect();
        let yhat: Vec<f64> = future_days.iter().map(|&d| fit.predict_scaled(d)).collect();
        let bounds = self.simulate_bounds(&fit, &future_days, &yhat)?;

        Ok(Prediction {
            estimates: yhat.iter().map(|v| v * fit.y_scale).collect(),
            bounds: Some(
                bounds
                    .into_iter()
                    .map(|(lo, hi)| (lo * fit.y_scale, hi * fit.y_scale))
                    .collect(),
            ),
        })
    }
}

/// Linear-interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::test_support::weekly;

    #[test]
    fn needs_two_points() {
        let err = DecomposableModel::with_seed(1).predict(&weekly(&[5.0]), 8).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::ModelFit {
                method: ForecastMethod::Decomposable,
                ..
            }
        ));
    }

    #[test]
    fn bounds_bracket_estimates() {
        let values: Vec<f64> = (0..30)
            .map(|i| 200.0 + 3.0 * i as f64 + if i % 3 == 0 { 15.0 } else { -7.0 })
            .collect();
        let p = DecomposableModel::with_seed(3).predict(&weekly(&values), 8).unwrap();
        let bounds = p.bounds.unwrap();
        assert_eq!(bounds.len(), 8);
        for (est, (lo, hi)) in p.estimates.iter().zip(bounds.iter()) {
            assert!(lo <= est && est <= hi, "{lo} <= {est} <= {hi}");
        }
    }

    #[test]
    fn linear_history_extrapolates_linearly() {
        let values: Vec<f64> = (0..20).map(|i| 50.0 + 2.0 * i as f64).collect();
        let p = DecomposableModel::with_seed(0).predict(&weekly(&values), 2).unwrap();
        assert!((p.estimates[0] - 90.0).abs() < 1.0, "got {}", p.estimates[0]);
        assert!((p.estimates[1] - 92.0).abs() < 1.0, "got {}", p.estimates[1]);
    }

    #[test]
    fn constant_history_is_flat_with_tight_bounds() {
        let p = DecomposableModel::with_seed(0).predict(&weekly(&[100.0; 12]), 4).unwrap();
        for (est, (lo, hi)) in p.estimates.iter().zip(p.bounds.unwrap()) {
            assert!((est - 100.0).abs() < 1e-6);
            assert!((hi - lo).abs() < 1e-6);
        }
    }

    #[test]
    fn same_seed_same_bounds() {
        let values = [10.0, 14.0, 9.0, 13.0, 17.0, 12.0, 16.0, 20.0];
        let a = DecomposableModel::with_seed(9).predict(&weekly(&values), 8).unwrap();
        let b = DecomposableModel::with_seed(9).predict(&weekly(&values), 8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn yearly_seasonality_needs_two_years() {
        let short: Vec<f64> = (0..52).map(|i| i as f64).collect();
        let long: Vec<f64> = (0..110).map(|i| i as f64).collect();
        let model = DecomposableModel::with_seed(0);
        assert!(!model.fit(&weekly(&short)).unwrap().yearly);
        assert!(model.fit(&weekly(&long)).unwrap().yearly);
    }

    #[test]
    fn quantile_interpolates() {
        let v = [0.0, 10.0];
        assert!((quantile(&v, 0.5) - 5.0).abs() < 1e-12);
        assert_eq!(quantile(&v, 0.0), 0.0);
        assert_eq!(quantile(&v, 1.0), 10.0);
    }
}
