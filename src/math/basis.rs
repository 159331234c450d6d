//! Regression basis functions for the decomposable model.
//!
//! - Fourier terms: `sin(2π k t / P)`, `cos(2π k t / P)` for `k = 1..=order`
//! - Changepoint hinges: `max(0, t - s_j)`, the slope change after changepoint `s_j`
//!
//! Fourier `t` is measured in days since the first observation, so the period
//! `P` is in days too. Hinges work on any time scale.

use std::f64::consts::PI;

/// Length of a year in days, used as the yearly seasonal period.
pub const YEAR_DAYS: f64 = 365.25;

/// Fill `out` with `2 * order` Fourier terms (sin/cos interleaved) at time `t`.
///
/// # Panics
/// Panics if `out.len() < 2 * order`.
pub fn fill_fourier_terms(t: f64, period: f64, order: usize, out: &mut [f64]) {
    for k in 1..=order {
        let x = 2.0 * PI * k as f64 * t / period;
        out[2 * (k - 1)] = x.sin();
        out[2 * (k - 1) + 1] = x.cos();
    }
}

/// Slope-change basis for a changepoint at `s`.
pub fn hinge(t: f64, s: f64) -> f64 {
    (t - s).max(0.0)
}

/// Evenly spaced changepoints over the first `range` fraction of `ts`.
///
/// Mirrors the usual "potential changepoints in the first 80% of history" rule;
/// the first observation is never a changepoint.
pub fn changepoint_grid(ts: &[f64], count: usize, range: f64) -> Vec<f64> {
    if ts.len() < 3 || count == 0 {
        return Vec::new();
    }
    let hist = ((ts.len() as f64 * range).floor() as usize).clamp(1, ts.len() - 1);
    let count = count.min(hist);
    (1..=count)
        .map(|j| {
            let idx = ((j as f64 * hist as f64) / (count as f64 + 1.0)).round() as usize;
            ts[idx.clamp(1, ts.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourier_terms_are_periodic() {
        let mut a = [0.0; 4];
        let mut b = [0.0; 4];
        fill_fourier_terms(10.0, YEAR_DAYS, 2, &mut a);
        fill_fourier_terms(10.0 + YEAR_DAYS, YEAR_DAYS, 2, &mut b);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn hinge_is_zero_before_changepoint() {
        assert_eq!(hinge(3.0, 5.0), 0.0);
        assert_eq!(hinge(8.0, 5.0), 3.0);
    }

    #[test]
    fn changepoints_sit_inside_history() {
        let ts: Vec<f64> = (0..50).map(|i| i as f64 * 7.0).collect();
        let cps = changepoint_grid(&ts, 10, 0.8);
        assert_eq!(cps.len(), 10);
        assert!(cps.iter().all(|&c| c > 0.0 && c <= ts[40]));
        assert!(cps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn short_history_has_no_changepoints() {
        assert!(changepoint_grid(&[0.0, 7.0], 5, 0.8).is_empty());
    }
}
