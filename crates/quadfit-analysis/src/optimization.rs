//! Iterative best-fit quadratic.
//!
//! Fits the same model as [`crate::interpolate`] but through the
//! Levenberg–Marquardt solver, seeded with a fixed guess rather than solved
//! in closed form. The two results are computed independently.

use nalgebra::{DMatrix, DVector};
use quadfit_core::PriceSeries;

use crate::least_squares::{LeastSquaresProblem, LevenbergMarquardt, SolverReport};
use crate::polynomial::{FittedSeries, Quadratic};

/// Seed for the optimizer: `x² + 2x + 3`.
pub const INITIAL_GUESS: Quadratic = Quadratic::new(1.0, 2.0, 3.0);

/// Result of [`optimize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Optimization {
    pub coefficients: Quadratic,
    pub fitted: FittedSeries,
    pub report: SolverReport,
}

/// Residuals `close - (a·x² + b·x + c)` over `(day_index, close)` points.
#[derive(Debug, Clone)]
pub struct QuadraticResiduals {
    points: Vec<(f64, f64)>,
}

impl QuadraticResiduals {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    fn model(params: &DVector<f64>) -> Quadratic {
        Quadratic::new(params[0], params[1], params[2])
    }
}

impl LeastSquaresProblem for QuadraticResiduals {
    fn parameter_count(&self) -> usize {
        3
    }

    fn residuals(&self, params: &DVector<f64>) -> DVector<f64> {
        let model = Self::model(params);
        DVector::from_iterator(
            self.points.len(),
            self.points.iter().map(|&(x, y)| y - model.evaluate(x)),
        )
    }

    fn jacobian(&self, _params: &DVector<f64>) -> DMatrix<f64> {
        DMatrix::from_fn(self.points.len(), 3, |row, col| {
            let x = self.points[row].0;
            match col {
                0 => -x * x,
                1 => -x,
                _ => -1.0,
            }
        })
    }
}

/// Best-fit quadratic from [`INITIAL_GUESS`] with default solver settings.
pub fn optimize(series: &PriceSeries) -> Optimization {
    optimize_with(series, INITIAL_GUESS, &LevenbergMarquardt::default())
}

/// Best-fit quadratic from `initial` using `solver`.
///
/// A run that exhausts its evaluation budget still yields its last
/// parameters; the report records that it did not converge.
pub fn optimize_with(
    series: &PriceSeries,
    initial: Quadratic,
    solver: &LevenbergMarquardt,
) -> Optimization {
    let problem = QuadraticResiduals::new(series.points());
    let (params, report) =
        solver.minimize(&problem, DVector::from_row_slice(&initial.coefficients()));

    let coefficients = QuadraticResiduals::model(&params);
    let fitted = coefficients.evaluate_series(series.len());

    tracing::debug!(
        symbol = %series.symbol(),
        termination = ?report.termination,
        evaluations = report.evaluations,
        iterations = report.iterations,
        "least-squares solver finished"
    );
    if !report.converged() {
        tracing::warn!(
            symbol = %series.symbol(),
            evaluations = report.evaluations,
            "least-squares solver did not converge; using last estimate"
        );
    }
    tracing::info!(
        symbol = %series.symbol(),
        a = coefficients.a,
        b = coefficients.b,
        c = coefficients.c,
        sum_squared_residuals = report.sum_squared_residuals,
        "optimized quadratic"
    );

    Optimization {
        coefficients,
        fitted,
        report,
    }
}

#[cfg(test)]
mod tests {
    use quadfit_core::Symbol;
    use time::macros::date;

    use super::*;
    use crate::least_squares::Termination;

    fn series(values: &[f64]) -> PriceSeries {
        PriceSeries::from_values(
            Symbol::parse("TEST").expect("symbol"),
            date!(2024 - 03 - 01),
            values,
        )
        .expect("series")
    }

    #[test]
    fn jacobian_is_negated_vandermonde() {
        let problem = QuadraticResiduals::new(vec![(0.0, 1.0), (3.0, 2.0)]);
        let jacobian = problem.jacobian(&DVector::zeros(3));

        assert_eq!(jacobian.row(0).iter().copied().collect::<Vec<_>>(), vec![-0.0, -0.0, -1.0]);
        assert_eq!(jacobian.row(1).iter().copied().collect::<Vec<_>>(), vec![-9.0, -3.0, -1.0]);
    }

    #[test]
    fn residuals_are_observed_minus_model() {
        let problem = QuadraticResiduals::new(vec![(2.0, 20.0)]);
        let residuals = problem.residuals(&DVector::from_row_slice(&[1.0, 2.0, 3.0]));
        assert_eq!(residuals[0], 9.0);
    }

    #[test]
    fn recovers_exact_quadratic_from_fixed_seed() {
        let values: Vec<f64> = (0..20)
            .map(|d| {
                let x = f64::from(d);
                -0.05 * x * x + 1.5 * x + 120.0
            })
            .collect();

        let result = optimize(&series(&values));

        assert!(result.report.converged(), "{:?}", result.report);
        assert!((result.coefficients.a + 0.05).abs() < 1e-6);
        assert!((result.coefficients.b - 1.5).abs() < 1e-5);
        assert!((result.coefficients.c - 120.0).abs() < 1e-4);
    }

    #[test]
    fn tiny_budget_still_returns_estimate() {
        let result = optimize_with(
            &series(&[100.0, 101.0, 99.5, 102.0]),
            INITIAL_GUESS,
            &LevenbergMarquardt::default().with_max_evaluations(1),
        );

        assert_eq!(result.report.termination, Termination::MaxEvaluations);
        assert_eq!(result.coefficients, INITIAL_GUESS);
        assert_eq!(result.fitted.len(), 4);
    }
}
