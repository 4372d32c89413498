//! Least-squares line fitting.
//!
//! The seasonal decomposition model needs the linear trend of a short monthly
//! series. We solve the two-column least squares problem via SVD:
//! nalgebra's `QR::solve` is intended for square systems and will panic for
//! tall matrices, and SVD stays robust when the series is nearly flat.

use nalgebra::{DMatrix, DVector};

/// Fit `y = intercept + slope * x` and return `(intercept, slope)`.
///
/// Returns `None` if the inputs are degenerate (fewer than two points,
/// mismatched lengths, or an ill-conditioned system).
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len();
    let mut design = DMatrix::zeros(n, 2);
    for (i, &x) in xs.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = x;
    }
    let y = DVector::from_row_slice(ys);

    let svd = design.svd(true, true);
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(&y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some((beta[0], beta[1]));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [2.0, 5.0, 8.0, 11.0];
        let (a, b) = fit_line(&xs, &ys).unwrap();
        assert!((a - 2.0).abs() < 1e-10);
        assert!((b - 3.0).abs() < 1e-10);
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(fit_line(&[1.0], &[1.0]).is_none());
        assert!(fit_line(&[1.0, 2.0], &[1.0]).is_none());
    }
}
