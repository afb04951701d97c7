//! Levenberg–Marquardt nonlinear least-squares solver.
//!
//! Minimizes `‖r(p)‖²` for a residual function `r` supplied through
//! [`LeastSquaresProblem`]. Each iteration solves the damped normal equations
//!
//! ```text
//! (JᵀJ + λ·D) δ = -Jᵀr
//! ```
//!
//! with `D = diag(JᵀJ)` (Marquardt scaling; zero columns use 1), accepts the
//! step when it lowers the cost, and adapts `λ` from the gain ratio between
//! actual and predicted reduction.
//!
//! Stopping rules and default tolerances follow MINPACK's `lmdif`:
//! - relative cost reduction (actual and predicted) `≤ ftol`
//! - scaled step `‖D½δ‖ ≤ xtol · ‖D½p‖`
//! - gradient orthogonality `≤ gtol`
//! - `200 · (parameters + 1)` residual evaluations
//!
//! Running out of evaluations is not an error: the last accepted parameters
//! are returned and the report says `converged == false`.

use nalgebra::{DMatrix, DVector};

/// Residual function and its Jacobian.
pub trait LeastSquaresProblem {
    fn parameter_count(&self) -> usize;

    /// `r(p)`; one entry per observation.
    fn residuals(&self, params: &DVector<f64>) -> DVector<f64>;

    /// `∂r/∂p`, shape `(residuals, parameters)`.
    fn jacobian(&self, params: &DVector<f64>) -> DMatrix<f64>;
}

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Actual and predicted relative reductions fell below `ftol`.
    RelativeReduction,
    /// The scaled step fell below `xtol` relative to the parameters.
    RelativeStep,
    /// The residual vector is orthogonal to the Jacobian columns within `gtol`.
    Orthogonality,
    /// Residuals are exactly zero.
    ExactFit,
    /// The evaluation budget ran out.
    MaxEvaluations,
}

impl Termination {
    pub const fn converged(self) -> bool {
        !matches!(self, Self::MaxEvaluations)
    }
}

/// Diagnostics from one [`LevenbergMarquardt::minimize`] run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverReport {
    pub evaluations: usize,
    pub iterations: usize,
    pub termination: Termination,
    pub sum_squared_residuals: f64,
}

impl SolverReport {
    pub const fn converged(&self) -> bool {
        self.termination.converged()
    }
}

/// Solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevenbergMarquardt {
    pub ftol: f64,
    pub xtol: f64,
    pub gtol: f64,
    /// Residual evaluation budget; `None` means `200 · (parameters + 1)`.
    pub max_evaluations: Option<usize>,
    pub initial_damping: f64,
}

impl Default for LevenbergMarquardt {
    fn default() -> Self {
        Self {
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            gtol: 0.0,
            max_evaluations: None,
            initial_damping: 1e-3,
        }
    }
}

impl LevenbergMarquardt {
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = Some(max_evaluations);
        self
    }

    /// Minimize `problem` starting from `initial`.
    pub fn minimize<P>(&self, problem: &P, initial: DVector<f64>) -> (DVector<f64>, SolverReport)
    where
        P: LeastSquaresProblem + ?Sized,
    {
        let n = problem.parameter_count();
        let budget = self.max_evaluations.unwrap_or(200 * (n + 1));

        let mut params = initial;
        let mut residuals = problem.residuals(&params);
        let mut cost = residuals.norm_squared();
        let mut evaluations = 1;
        let mut iterations = 0;
        let mut lambda = self.initial_damping;
        let mut nu = 2.0;

        let termination = 'outer: loop {
            if cost == 0.0 {
                break Termination::ExactFit;
            }

            let jacobian = problem.jacobian(&params);
            let jtj = jacobian.transpose() * &jacobian;
            let gradient = jacobian.transpose() * &residuals;

            if self.is_orthogonal(&jacobian, &gradient, cost) {
                break Termination::Orthogonality;
            }

            let scale = DVector::from_fn(n, |i, _| {
                let d = jtj[(i, i)];
                if d > 0.0 {
                    d
                } else {
                    1.0
                }
            });
            let scaled_params_norm = params.component_mul(&scale.map(f64::sqrt)).norm();

            loop {
                if evaluations >= budget {
                    break 'outer Termination::MaxEvaluations;
                }

                let mut damped = jtj.clone();
                for i in 0..n {
                    damped[(i, i)] += lambda * scale[i];
                }

                let Some(step) = solve_damped(damped, -&gradient) else {
                    lambda *= nu;
                    nu *= 2.0;
                    continue;
                };

                let scaled_step_norm = step.component_mul(&scale.map(f64::sqrt)).norm();
                let candidate = &params + &step;
                let candidate_residuals = problem.residuals(&candidate);
                let candidate_cost = candidate_residuals.norm_squared();
                evaluations += 1;

                // Predicted reduction of ½‖r‖² under the linear model.
                let predicted =
                    0.5 * step.dot(&(step.component_mul(&scale) * lambda - &gradient));
                let actual = 0.5 * (cost - candidate_cost);

                if candidate_cost.is_finite() && candidate_cost < cost {
                    let rho = if predicted > 0.0 { actual / predicted } else { 1.0 };
                    let relative_actual = (cost - candidate_cost) / cost;
                    let relative_predicted = 2.0 * predicted / cost;

                    params = candidate;
                    residuals = candidate_residuals;
                    cost = candidate_cost;
                    iterations += 1;

                    lambda *= (1.0_f64 / 3.0).max(1.0 - (2.0 * rho - 1.0).powi(3));
                    nu = 2.0;

                    if relative_actual <= self.ftol && relative_predicted.abs() <= self.ftol {
                        break 'outer Termination::RelativeReduction;
                    }
                    if scaled_step_norm <= self.xtol * scaled_params_norm {
                        break 'outer Termination::RelativeStep;
                    }
                    break;
                }

                if scaled_step_norm <= self.xtol * scaled_params_norm {
                    break 'outer Termination::RelativeStep;
                }

                lambda *= nu;
                nu *= 2.0;
            }
        };

        let report = SolverReport {
            evaluations,
            iterations,
            termination,
            sum_squared_residuals: cost,
        };
        (params, report)
    }

    /// Largest cosine between the residual vector and any Jacobian column.
    fn is_orthogonal(&self, jacobian: &DMatrix<f64>, gradient: &DVector<f64>, cost: f64) -> bool {
        let residual_norm = cost.sqrt();
        let max_cosine = jacobian
            .column_iter()
            .zip(gradient.iter())
            .filter_map(|(column, g)| {
                let column_norm = column.norm();
                (column_norm > 0.0).then(|| g.abs() / (column_norm * residual_norm))
            })
            .fold(0.0, f64::max);
        max_cosine <= self.gtol
    }
}

fn solve_damped(matrix: DMatrix<f64>, rhs: DVector<f64>) -> Option<DVector<f64>> {
    let step = match matrix.clone().cholesky() {
        Some(cholesky) => cholesky.solve(&rhs),
        None => matrix.svd(true, true).solve(&rhs, f64::EPSILON).ok()?,
    };
    step.iter().all(|v| v.is_finite()).then_some(step)
}
