//! Least squares solvers.
//!
//! Every strategy in this crate that fits a trend reduces to a small linear
//! regression:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2  (+ Σ λ_j β_j^2 for the ridge variant)
//! ```
//!
//! We solve with SVD so tall, rank-deficient designs (e.g. a constant series,
//! or changepoints placed past the last observation) still return the
//! minimum-norm solution instead of failing.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() != y.len() || x.nrows() == 0 || x.ncols() == 0 {
        return None;
    }
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Ridge regression with a per-coefficient penalty.
///
/// Implemented by row augmentation: for each column `j` with `λ_j > 0` we append
/// a pseudo-observation `sqrt(λ_j) * e_j = 0`.
pub fn solve_ridge(x: &DMatrix<f64>, y: &DVector<f64>, penalties: &[f64]) -> Option<DVector<f64>> {
    if penalties.len() != x.ncols() {
        return None;
    }
    let extra: Vec<usize> = (0..penalties.len()).filter(|&j| penalties[j] > 0.0).collect();
    let n = x.nrows();
    let p = x.ncols();

    let mut xa = DMatrix::<f64>::zeros(n + extra.len(), p);
    xa.rows_mut(0, n).copy_from(x);
    let mut ya = DVector::<f64>::zeros(n + extra.len());
    ya.rows_mut(0, n).copy_from(y);

    for (k, &j) in extra.iter().enumerate() {
        xa[(n + k, j)] = penalties[j].sqrt();
    }

    solve_least_squares(&xa, &ya)
}

/// Fit `y = intercept + slope * x`. Returns `(intercept, slope)`.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mut design = DMatrix::<f64>::zeros(xs.len(), 2);
    for (i, &x) in xs.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = x;
    }
    let beta = solve_least_squares(&design, &DVector::from_column_slice(ys))?;
    Some((beta[0], beta[1]))
}
