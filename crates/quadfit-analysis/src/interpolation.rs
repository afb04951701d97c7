//! Direct least-squares polynomial fit.
//!
//! # How it works
//! - Builds a Vandermonde **design matrix** with columns `[x², x, 1]` and one
//!   row per point.
//! - Solves `A · p = y` in the least-squares sense through the **SVD** of `A`,
//!   which stays stable on the tall, mildly ill-conditioned systems a month of
//!   day indices produces.
//!
//! Fewer than three points cannot determine a quadratic. In that case the
//! degree drops to `n - 1` and the missing leading coefficients are zero: one
//! point gives the constant through it, two points give the line through both.

use nalgebra::{DMatrix, DVector, SVD};
use quadfit_core::PriceSeries;

use crate::error::{AnalysisError, Result};
use crate::polynomial::{FittedSeries, Quadratic};

/// Result of [`interpolate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    pub coefficients: Quadratic,
    pub fitted: FittedSeries,
    /// Degree actually fitted; below 2 only for series shorter than 3 points.
    pub degree: usize,
}

/// Fit a quadratic to `(day_index, close)` and evaluate it at every day.
///
/// # Errors
/// Returns [`AnalysisError::Algebra`] if the solver fails or yields NaN.
pub fn interpolate(series: &PriceSeries) -> Result<Interpolation> {
    let points = series.points();
    let (coefficients, degree) = fit_quadratic(&points)?;
    let fitted = coefficients.evaluate_series(series.len());

    tracing::info!(
        symbol = %series.symbol(),
        degree,
        a = coefficients.a,
        b = coefficients.b,
        c = coefficients.c,
        "interpolated quadratic"
    );

    Ok(Interpolation {
        coefficients,
        fitted,
        degree,
    })
}

/// Least-squares quadratic through arbitrary `(x, y)` points.
///
/// Returns the coefficients and the degree used (see module docs for the
/// short-input fallback).
///
/// # Errors
/// - [`AnalysisError::NoData`]: `points` is empty.
/// - [`AnalysisError::Algebra`]: the system could not be solved.
pub fn fit_quadratic(points: &[(f64, f64)]) -> Result<(Quadratic, usize)> {
    if points.is_empty() {
        return Err(AnalysisError::NoData);
    }

    let degree = (points.len() - 1).min(2);
    let solved = fit_polynomial(points, degree)?;

    let mut coefficients = [0.0; 3];
    coefficients[2 - degree..].copy_from_slice(&solved);
    Ok((Quadratic::from_coefficients(coefficients), degree))
}

/// Coefficients of the degree-`degree` fit, highest power first.
fn fit_polynomial(points: &[(f64, f64)], degree: usize) -> Result<Vec<f64>> {
    let k = degree + 1;
    let (design, observed) = design_matrix(points, k);
    let shape = design.shape();

    let decomp = SVD::new(design, true, true);

    // ~= machine_epsilon * max(size) * max_singular
    let sigma_max = decomp.singular_values.max();
    let epsilon = f64::EPSILON * shape.0.max(shape.1) as f64 * sigma_max;

    let solution = decomp.solve(&observed, epsilon).map_err(AnalysisError::Algebra)?;
    let coefficients: Vec<f64> = solution.iter().copied().collect();

    if coefficients.iter().any(|c| c.is_nan()) {
        return Err(AnalysisError::Algebra("NaN in coefficients"));
    }

    Ok(coefficients)
}

/// Rows `[x^(k-1), …, x, 1]` and the matching `y` column.
fn design_matrix(points: &[(f64, f64)], k: usize) -> (DMatrix<f64>, DVector<f64>) {
    let design = DMatrix::from_fn(points.len(), k, |row, col| {
        let power = (k - 1 - col) as i32;
        points[row].0.powi(power)
    });
    let observed = DVector::from_iterator(points.len(), points.iter().map(|&(_, y)| y));
    (design, observed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn recovers_exact_quadratic() {
        let points: Vec<(f64, f64)> = (0..10)
            .map(|x| {
                let x = f64::from(x);
                (x, 0.5 * x * x - 3.0 * x + 7.0)
            })
            .collect();

        let (q, degree) = fit_quadratic(&points).expect("fit");

        assert_eq!(degree, 2);
        assert_close(q.a, 0.5);
        assert_close(q.b, -3.0);
        assert_close(q.c, 7.0);
    }

    #[test]
    fn single_point_falls_back_to_constant() {
        let (q, degree) = fit_quadratic(&[(0.0, 42.0)]).expect("fit");

        assert_eq!(degree, 0);
        assert_eq!(q.a, 0.0);
        assert_eq!(q.b, 0.0);
        assert_close(q.c, 42.0);
    }

    #[test]
    fn two_points_fall_back_to_line() {
        let (q, degree) = fit_quadratic(&[(0.0, 10.0), (1.0, 12.0)]).expect("fit");

        assert_eq!(degree, 1);
        assert_eq!(q.a, 0.0);
        assert_close(q.b, 2.0);
        assert_close(q.c, 10.0);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(fit_quadratic(&[]), Err(AnalysisError::NoData));
    }

    #[test]
    fn design_matrix_orders_powers_descending() {
        let (design, observed) = design_matrix(&[(2.0, 5.0), (3.0, 6.0)], 3);
        assert_eq!(design.row(0).iter().copied().collect::<Vec<_>>(), vec![4.0, 2.0, 1.0]);
        assert_eq!(design.row(1).iter().copied().collect::<Vec<_>>(), vec![9.0, 3.0, 1.0]);
        assert_eq!(observed.as_slice(), &[5.0, 6.0]);
    }
}
