//! Least squares solver and straight-line fit.
//!
//! Both distribution models reduce to the same problem after linearization:
//!
//! ```text
//! minimize Σ (y_i - (c + s·x_i))^2
//! ```
//!
//! Implementation choices:
//! - We build a `[1, x]` design matrix and solve with SVD, which handles the
//!   tall (more rows than columns) case robustly.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - A rank-deficient design (every x identical) has no unique slope, so we
//!   reject it up front instead of returning a minimum-norm solution.

use nalgebra::{DMatrix, DVector};

use crate::error::AnalysisError;

/// Slope and intercept of a fitted straight line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Ordinary least squares fit of `y = intercept + slope·x`.
///
/// `label` names the caller in error messages (the model being fitted).
pub fn fit_line(xs: &[f64], ys: &[f64], label: &'static str) -> Result<LineFit, AnalysisError> {
    if xs.len() != ys.len() {
        return Err(AnalysisError::LengthMismatch {
            sizes: xs.len(),
            passing: ys.len(),
        });
    }
    if xs.len() < 2 || !has_distinct_values(xs) {
        return Err(AnalysisError::InsufficientData {
            model: label,
            valid: xs.len(),
        });
    }

    let n = xs.len();
    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { xs[i] });
    let target = DVector::from_column_slice(ys);

    let beta = solve_least_squares(&design, &target).ok_or(AnalysisError::SingularRegression)?;

    Ok(LineFit {
        slope: beta[1],
        intercept: beta[0],
    })
}

fn has_distinct_values(xs: &[f64]) -> bool {
    let first = xs[0];
    xs.iter().any(|&x| (x - first).abs() > f64::EPSILON * first.abs().max(1.0))
}
