//! Additive Holt–Winters (triple exponential smoothing).
//!
//! ```text
//! level_t    = α (y_t - s_{t-P}) + (1 - α)(level_{t-1} + trend_{t-1})
//! trend_t    = β (level_t - level_{t-1}) + (1 - β) trend_{t-1}
//! s_t        = γ (y_t - level_t) + (1 - γ) s_{t-P}
//! ŷ_{n+h}    = level_n + h·trend_n + s_{n+h-P·k}
//! ```
//!
//! The season is fixed at `P = 4` weeks. Initial components come from the first
//! two seasons, which is why at least `2P` points are required. Smoothing
//! parameters are picked by an exhaustive grid search over one-step-ahead SSE,
//! so the result is deterministic for a given input.

use tracing::debug;

use crate::domain::{ForecastMethod, WeeklyPoint};
use crate::error::ForecastError;
use crate::forecast::{ForecastStrategy, Prediction, require_history};

/// Buckets per seasonal cycle.
pub const SEASONAL_PERIOD: usize = 4;

/// Smoothing parameter grid: 0.05, 0.10, …, 0.95.
const GRID_STEPS: usize = 19;

#[derive(Debug, Clone, Copy)]
pub struct HoltWinters {
    pub period: usize,
}

impl Default for HoltWinters {
    fn default() -> Self {
        Self {
            period: SEASONAL_PERIOD,
        }
    }
}

/// Smoothing parameters (α level, β trend, γ season).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Final state after running the recursions over the whole history.
#[derive(Debug, Clone)]
struct State {
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    sse: f64,
}

impl HoltWinters {
    pub fn min_history(&self) -> usize {
        2 * self.period
    }

    fn initial_state(&self, data: &[f64]) -> State {
        let p = self.period;
        let first = data[..p].iter().sum::<f64>() / p as f64;
        let second = data[p..2 * p].iter().sum::<f64>() / p as f64;
        State {
            level: first,
            trend: (second - first) / p as f64,
            seasonal: data[..p].iter().map(|v| v - first).collect(),
            sse: 0.0,
        }
    }

    fn run(&self, data: &[f64], s: Smoothing) -> State {
        let p = self.period;
        let mut st = self.initial_state(data);

        for (i, &value) in data.iter().enumerate().skip(p) {
            let idx = i % p;
            let prev_level = st.level;
            let prev_season = st.seasonal[idx];

            let one_step = st.level + st.trend + prev_season;
            st.sse += (value - one_step).powi(2);

            st.level = s.alpha * (value - prev_season) + (1.0 - s.alpha) * (st.level + st.trend);
            st.trend = s.beta * (st.level - prev_level) + (1.0 - s.beta) * st.trend;
            st.seasonal[idx] = s.gamma * (value - st.level) + (1.0 - s.gamma) * prev_season;
        }
        st
    }

    /// Grid search for the parameters with the lowest one-step SSE.
    ///
    /// Ties keep the first (smallest) parameters encountered.
    pub fn optimize(&self, data: &[f64]) -> Smoothing {
        let grid: Vec<f64> = (1..=GRID_STEPS).map(|k| k as f64 * 0.05).collect();
        let mut best = Smoothing {
            alpha: grid[0],
            beta: grid[0],
            gamma: grid[0],
        };
        let mut best_sse = f64::INFINITY;

        for &alpha in &grid {
            for &beta in &grid {
                for &gamma in &grid {
                    let s = Smoothing { alpha, beta, gamma };
                    let sse = self.run(data, s).sse;
                    if sse < best_sse {
                        best_sse = sse;
                        best = s;
                    }
                }
            }
        }
        best
    }
}

impl ForecastStrategy for HoltWinters {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::Seasonal
    }

    fn predict(&self, history: &[WeeklyPoint], horizon: usize) -> Result<Prediction, ForecastError> {
        require_history(self.method(), history, self.min_history())?;

        let data: Vec<f64> = history.iter().map(|p| p.value).collect();
        let params = self.optimize(&data);
        let st = self.run(&data, params);
        if !(st.level.is_finite() && st.trend.is_finite()) {
            return Err(ForecastError::ModelFit {
                method: self.method(),
                reason: "smoothing diverged".to_string(),
            });
        }
        debug!(
            alpha = params.alpha,
            beta = params.beta,
            gamma = params.gamma,
            sse = st.sse,
            "holt-winters fitted"
        );

        let n = data.len();
        let estimates = (1..=horizon)
            .map(|h| st.level + h as f64 * st.trend + st.seasonal[(n + h - 1) % self.period])
            .collect();

        Ok(Prediction {
            estimates,
            bounds: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::test_support::weekly;

    #[test]
    fn too_short_history_fails_before_fitting() {
        let history = weekly(&[1.0, 2.0, 3.0]);
        let err = HoltWinters::default().predict(&history, 8).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientHistory {
                method: ForecastMethod::Seasonal,
                required: 8,
                actual: 3,
            }
        );
    }

    #[test]
    fn constant_series_stays_constant() {
        let history = weekly(&[50.0; 12]);
        let p = HoltWinters::default().predict(&history, 8).unwrap();
        for v in p.estimates {
            assert!((v - 50.0).abs() < 1e-6, "got {v}");
        }
    }

    #[test]
    fn repeats_a_clean_seasonal_pattern() {
        let pattern = [10.0, 20.0, 30.0, 20.0];
        let values: Vec<f64> = (0..16).map(|i| pattern[i % 4]).collect();
        let history = weekly(&values);
        let p = HoltWinters::default().predict(&history, 4).unwrap();
        for (got, want) in p.estimates.iter().zip(pattern) {
            assert!((got - want).abs() < 1.0, "got {got}, want {want}");
        }
    }

    #[test]
    fn follows_a_trend() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 + 5.0 * i as f64).collect();
        let p = HoltWinters::default().predict(&weekly(&values), 3).unwrap();
        assert!(p.estimates[0] > 190.0);
        assert!(p.estimates[2] > p.estimates[0]);
    }

    #[test]
    fn optimization_is_deterministic() {
        let values = [12.0, 18.0, 25.0, 16.0, 14.0, 21.0, 27.0, 17.0, 15.0, 22.0];
        let hw = HoltWinters::default();
        assert_eq!(hw.optimize(&values), hw.optimize(&values));
    }
}
