//! Limited-memory BFGS with box constraints.
//!
//! Each iteration:
//!
//! 1. builds a search direction from the two-loop recursion over the last
//!    `m` curvature pairs;
//! 2. zeroes direction components that are fixed (`lo == hi`) or would push
//!    a variable already sitting on a bound further out;
//! 3. backtracks from a unit step, halving up to `max_linesearch` times,
//!    until the Armijo and curvature conditions both hold, clipping every
//!    trial point into the box;
//! 4. records the new curvature pair when `yᵀs > 1e-10`;
//! 5. stops on a small projected gradient or a small relative change in `f`.
//!
//! A failed line search ends the run immediately. There is no restart.
//!
//! # References
//! - Nocedal, J. & Wright, S. "Numerical Optimization", 2nd ed., Algorithm 7.4
//! - Byrd, R., Lu, P., Nocedal, J. & Zhu, C. "A Limited Memory Algorithm for
//!   Bound Constrained Optimization" (1995)

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::VolSmileError;
use crate::optim::Bound;
use crate::optim::history::CurvatureHistory;

/// Configuration for [`minimize`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LbfgsbConfig {
    /// Maximum number of outer iterations.
    pub max_iter: usize,
    /// Relative tolerance on the change in objective value.
    pub f_tol: f64,
    /// Tolerance on the infinity norm of the projected gradient.
    pub g_tol: f64,
    /// Number of curvature pairs kept (`m`).
    pub history_size: usize,
    /// Maximum number of step halvings per line search.
    pub max_linesearch: usize,
    /// Armijo sufficient-decrease constant.
    pub c1: f64,
    /// Curvature-condition constant.
    pub c2: f64,
}

impl Default for LbfgsbConfig {
    fn default() -> Self {
        Self {
            max_iter: 15_000,
            f_tol: 1e-8,
            g_tol: 1e-5,
            history_size: 10,
            max_linesearch: 20,
            c1: 1e-4,
            c2: 0.9,
        }
    }
}

impl LbfgsbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    #[must_use]
    pub fn with_f_tol(mut self, f_tol: f64) -> Self {
        self.f_tol = f_tol;
        self
    }

    #[must_use]
    pub fn with_g_tol(mut self, g_tol: f64) -> Self {
        self.g_tol = g_tol;
        self
    }

    #[must_use]
    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    #[must_use]
    pub fn with_max_linesearch(mut self, max_linesearch: usize) -> Self {
        self.max_linesearch = max_linesearch;
        self
    }
}

/// How a [`minimize`] run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptimizeStatus {
    /// Projected gradient infinity norm fell below `g_tol`.
    GradientTolerance,
    /// Relative change in `f` fell below `f_tol`.
    FunctionTolerance,
    /// No step satisfied the line search conditions.
    LineSearchFailed,
    /// `max_iter` iterations ran without meeting a stopping criterion.
    MaxIterations,
}

impl OptimizeStatus {
    /// Numeric status: 0 on success, 1 otherwise.
    pub fn code(self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    pub fn is_success(self) -> bool {
        matches!(
            self,
            OptimizeStatus::GradientTolerance | OptimizeStatus::FunctionTolerance
        )
    }

    pub fn message(self) -> &'static str {
        match self {
            OptimizeStatus::GradientTolerance => "Optimization terminated successfully (gtol).",
            OptimizeStatus::FunctionTolerance => "Optimization terminated successfully (ftol).",
            OptimizeStatus::LineSearchFailed => "Line search failed.",
            OptimizeStatus::MaxIterations => "Maximum number of iterations exceeded.",
        }
    }
}

/// Outcome of a [`minimize`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimizeResult {
    /// Last accepted point.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub fun: f64,
    /// Number of objective/gradient evaluations.
    pub nfev: usize,
    /// Number of accepted steps, counting the one that met a stopping
    /// criterion. A start at the optimum therefore reports `1`.
    pub nit: usize,
    pub status: OptimizeStatus,
    pub message: String,
}

impl MinimizeResult {
    pub fn success(&self) -> bool {
        self.status.is_success()
    }
}

fn clip_into(x: &mut DVector<f64>, bounds: &[Bound]) {
    for (xi, &(lo, hi)) in x.iter_mut().zip(bounds) {
        *xi = xi.clamp(lo, hi);
    }
}

/// Zero direction components that are fixed or point out of the box.
fn project_direction(p: &mut DVector<f64>, x: &DVector<f64>, bounds: &[Bound]) {
    for (i, &(lo, hi)) in bounds.iter().enumerate() {
        if lo == hi || (x[i] <= lo && p[i] < 0.0) || (x[i] >= hi && p[i] > 0.0) {
            p[i] = 0.0;
        }
    }
}

/// Gradient with components that cannot be followed inside the box zeroed.
fn projected_gradient(grad: &DVector<f64>, x: &DVector<f64>, bounds: &[Bound]) -> DVector<f64> {
    let mut pg = grad.clone();
    for (i, &(lo, hi)) in bounds.iter().enumerate() {
        if lo == hi || (x[i] <= lo && grad[i] > 0.0) || (x[i] >= hi && grad[i] < 0.0) {
            pg[i] = 0.0;
        }
    }
    pg
}

fn validate_bounds(n: usize, bounds: &[Bound]) -> crate::error::Result<()> {
    if bounds.len() != n {
        return Err(VolSmileError::InvalidInput {
            message: format!("bounds has length {}, expected {n}", bounds.len()),
        });
    }
    for (i, &(lo, hi)) in bounds.iter().enumerate() {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(VolSmileError::InvalidInput {
                message: format!("bound {i} is not an interval: [{lo}, {hi}]"),
            });
        }
    }
    Ok(())
}

/// Minimize `f` subject to `lo ≤ x ≤ hi`.
///
/// `obj_grad(x, grad)` must return `f(x)` and overwrite every component of
/// `grad` with `∇f(x)`. The starting point is clipped into the box.
///
/// Convergence is judged on the ∞-norm of the projected gradient (the plain
/// gradient when unbounded). A projected quasi-Newton direction that is not a
/// descent direction is replaced by projected steepest descent and the
/// curvature history is dropped.
///
/// # Errors
/// Returns [`VolSmileError::InvalidInput`] if `bounds` does not match `x0`
/// in length or contains an interval with `lo > hi` or NaN ends.
/// Convergence failures are reported through [`MinimizeResult::status`].
///
/// ```
/// use volsmile::optim::{LbfgsbConfig, minimize, unbounded};
///
/// let target = [1.0, -2.0, 3.0];
/// let result = minimize(
///     |x, grad| {
///         let mut f = 0.0;
///         for i in 0..x.len() {
///             let d = x[i] - target[i];
///             f += d * d;
///             grad[i] = 2.0 * d;
///         }
///         f
///     },
///     &[0.0, 0.0, 0.0],
///     &unbounded(3),
///     &LbfgsbConfig::default(),
/// )?;
/// assert!(result.success());
/// assert!((result.x[1] + 2.0).abs() < 1e-6);
/// # Ok::<(), volsmile::VolSmileError>(())
/// ```
pub fn minimize<F>(
    mut obj_grad: F,
    x0: &[f64],
    bounds: &[Bound],
    config: &LbfgsbConfig,
) -> crate::error::Result<MinimizeResult>
where
    F: FnMut(&DVector<f64>, &mut DVector<f64>) -> f64,
{
    let n = x0.len();
    validate_bounds(n, bounds)?;

    let mut x = DVector::from_column_slice(x0);
    clip_into(&mut x, bounds);
    let mut grad = DVector::zeros(n);
    let mut f = obj_grad(&x, &mut grad);
    let mut nfev = 1;
    let mut nit = 0;
    let mut prev_f = f;

    let mut history = CurvatureHistory::new(config.history_size);
    let mut x_new = DVector::zeros(n);
    let mut grad_new = DVector::zeros(n);
    let mut outcome = None;

    while nit < config.max_iter {
        let mut p = history.direction(&grad);
        project_direction(&mut p, &x, bounds);

        // The projection can turn a quasi-Newton step uphill; fall back to
        // projected steepest descent and forget the stale curvature.
        if grad.dot(&p) >= 0.0 && !history.is_empty() {
            history.clear();
            p = -projected_gradient(&grad, &x, bounds);
        }

        let gtp = grad.dot(&p);
        let mut step = 1.0;
        let mut f_new = f;
        let mut accepted = false;

        for _ in 0..config.max_linesearch {
            x_new.copy_from(&x);
            x_new.axpy(step, &p, 1.0);
            clip_into(&mut x_new, bounds);

            f_new = obj_grad(&x_new, &mut grad_new);
            nfev += 1;

            if f_new <= f + config.c1 * step * gtp && grad_new.dot(&p) >= config.c2 * gtp {
                accepted = true;
                break;
            }
            step *= 0.5;
        }

        if !accepted {
            outcome = Some(OptimizeStatus::LineSearchFailed);
            break;
        }

        history.push(&x_new - &x, &grad_new - &grad);

        std::mem::swap(&mut x, &mut x_new);
        std::mem::swap(&mut grad, &mut grad_new);
        f = f_new;
        nit += 1;

        #[cfg(feature = "logging")]
        tracing::trace!(nit, f, step, "L-BFGS-B iteration");

        if projected_gradient(&grad, &x, bounds).amax() < config.g_tol {
            outcome = Some(OptimizeStatus::GradientTolerance);
            break;
        }

        if (f - prev_f).abs() < config.f_tol * (1.0 + f.abs()) {
            outcome = Some(OptimizeStatus::FunctionTolerance);
            break;
        }

        prev_f = f;
    }

    let status = outcome.unwrap_or(OptimizeStatus::MaxIterations);

    #[cfg(feature = "logging")]
    tracing::debug!(nit, nfev, f, ?status, "L-BFGS-B finished");

    Ok(MinimizeResult {
        x: x.iter().copied().collect(),
        fun: f,
        nfev,
        nit,
        status,
        message: status.message().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::unbounded;
    use approx::assert_abs_diff_eq;

    /// f(x) = Σ (xᵢ − tᵢ)²
    fn sphere(target: &[f64]) -> impl FnMut(&DVector<f64>, &mut DVector<f64>) -> f64 + '_ {
        move |x, grad| {
            let mut f = 0.0;
            for i in 0..x.len() {
                let d = x[i] - target[i];
                f += d * d;
                grad[i] = 2.0 * d;
            }
            f
        }
    }

    #[test]
    fn unconstrained_quadratic_converges() {
        let t = [0.5, -1.5, 2.0, 10.0, -0.25];
        let r = minimize(sphere(&t), &[0.0; 5], &unbounded(5), &LbfgsbConfig::default()).unwrap();
        assert_eq!(r.status.code(), 0);
        for i in 0..5 {
            assert_abs_diff_eq!(r.x[i], t[i], epsilon = 1e-6);
        }
        assert!(r.fun < 1e-12);
    }

    #[test]
    fn start_at_optimum_stops_on_gradient() {
        let t = [1.0, 2.0];
        let r = minimize(sphere(&t), &t, &unbounded(2), &LbfgsbConfig::default()).unwrap();
        assert_eq!(r.status, OptimizeStatus::GradientTolerance);
        assert_eq!(r.nit, 1);
        assert_eq!(r.x, vec![1.0, 2.0]);
    }

    #[test]
    fn zero_gradient_tolerance_stops_on_function_change() {
        let config = LbfgsbConfig::default().with_g_tol(0.0);
        let r = minimize(sphere(&[1.0]), &[0.0], &unbounded(1), &config).unwrap();
        assert_eq!(r.status, OptimizeStatus::FunctionTolerance);
        assert_eq!(r.message, "Optimization terminated successfully (ftol).");
        assert!(r.success());
        assert_abs_diff_eq!(r.x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.fun, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn box_active_on_every_coordinate() {
        let t = [1.0, 2.0, -3.0];
        let bounds = [(-1.0, 1.0); 3];
        let r = minimize(sphere(&t), &[0.0; 3], &bounds, &LbfgsbConfig::default()).unwrap();
        assert_eq!(r.status, OptimizeStatus::GradientTolerance);
        assert_eq!(r.x, vec![1.0, 1.0, -1.0]);
        assert_abs_diff_eq!(r.fun, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn tight_bound_clips_one_coordinate() {
        let t = [1.0, 2.0];
        let bounds = [(-0.5, 0.5), (f64::NEG_INFINITY, f64::INFINITY)];
        let r = minimize(sphere(&t), &[0.0, 0.0], &bounds, &LbfgsbConfig::default()).unwrap();
        assert!(r.x[0] >= -0.5 && r.x[0] <= 0.5);
        assert_eq!(r.x[0], 0.5);
        assert_abs_diff_eq!(r.x[1], 2.0, epsilon = 1e-3);
        assert!(r.success());
    }

    #[test]
    fn ftol_stall_against_box_stays_feasible() {
        let t = [-0.4716, -3.826, 0.0];
        let w = 1.9878;
        let bounds = [(-w, w); 3];
        let mut g = DVector::zeros(3);
        let start = DVector::from_column_slice(&[w; 3]);
        let initial = sphere(&t)(&start, &mut g);
        let r = minimize(sphere(&t), &[3.0; 3], &bounds, &LbfgsbConfig::default()).unwrap();
        assert!(r.success());
        assert!(r.x.iter().all(|x| (-w..=w).contains(x)), "{:?}", r.x);
        assert!(r.fun <= initial);
    }

    #[test]
    fn fixed_variable_never_moves() {
        let t = [3.0, 4.0];
        let bounds = [(0.25, 0.25), (f64::NEG_INFINITY, f64::INFINITY)];
        let r = minimize(sphere(&t), &[0.25, 0.0], &bounds, &LbfgsbConfig::default()).unwrap();
        assert_eq!(r.x[0], 0.25);
        assert_abs_diff_eq!(r.x[1], 4.0, epsilon = 1e-6);
    }

    #[test]
    fn start_outside_box_is_clipped() {
        let t = [0.0];
        let r = minimize(sphere(&t), &[5.0], &[(1.0, 2.0)], &LbfgsbConfig::default()).unwrap();
        assert_eq!(r.x, vec![1.0]);
    }

    #[test]
    fn wrong_gradient_fails_line_search() {
        // Reported gradient has the wrong sign, so every trial step goes uphill.
        let r = minimize(
            |x, grad| {
                grad[0] = -1.0;
                x[0]
            },
            &[0.0],
            &unbounded(1),
            &LbfgsbConfig::default(),
        )
        .unwrap();
        assert_eq!(r.status, OptimizeStatus::LineSearchFailed);
        assert_eq!(r.message, "Line search failed.");
        assert_eq!(r.status.code(), 1);
        assert_eq!(r.nfev, 21);
        assert_eq!(r.nit, 0);
        assert_eq!(r.x, vec![0.0]);
    }

    #[test]
    fn zero_iterations_reports_exhaustion() {
        let config = LbfgsbConfig::default().with_max_iter(0);
        let r = minimize(sphere(&[1.0]), &[0.0], &unbounded(1), &config).unwrap();
        assert_eq!(r.status, OptimizeStatus::MaxIterations);
        assert_eq!(r.message, "Maximum number of iterations exceeded.");
        assert_eq!(r.nfev, 1);
        assert_eq!(r.x, vec![0.0]);
        assert_eq!(r.fun, 1.0);
    }

    #[test]
    fn non_finite_objective_is_never_accepted() {
        let r = minimize(
            |x, grad| {
                grad[0] = 2.0 * (x[0] - 1.0);
                if x[0] > 0.5 { f64::NAN } else { (x[0] - 1.0).powi(2) }
            },
            &[0.0],
            &unbounded(1),
            &LbfgsbConfig::default(),
        )
        .unwrap();
        assert!(r.fun.is_finite());
        assert!(r.x[0] <= 0.5);
    }

    #[test]
    fn objective_never_increases() {
        let t = [0.3, -0.7, 1.1];
        let mut f0 = DVector::zeros(3);
        let start = [2.0, 2.0, 2.0];
        let initial = sphere(&t)(&DVector::from_column_slice(&start), &mut f0);
        let r = minimize(sphere(&t), &start, &unbounded(3), &LbfgsbConfig::default()).unwrap();
        assert!(r.fun <= initial);
    }

    #[test]
    fn rejects_mismatched_bounds() {
        let r = minimize(sphere(&[0.0]), &[0.0, 0.0], &unbounded(1), &LbfgsbConfig::default());
        assert!(matches!(r, Err(VolSmileError::InvalidInput { .. })));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let r = minimize(sphere(&[0.0]), &[0.0], &[(1.0, -1.0)], &LbfgsbConfig::default());
        assert!(matches!(r, Err(VolSmileError::InvalidInput { .. })));
    }

    #[test]
    fn status_codes() {
        assert_eq!(OptimizeStatus::GradientTolerance.code(), 0);
        assert_eq!(OptimizeStatus::FunctionTolerance.code(), 0);
        assert_eq!(OptimizeStatus::LineSearchFailed.code(), 1);
        assert_eq!(OptimizeStatus::MaxIterations.code(), 1);
    }

    #[test]
    fn config_serde_round_trip() {
        let config = LbfgsbConfig::new().with_history_size(5).with_g_tol(1e-7);
        let json = serde_json::to_string(&config).unwrap();
        let back: LbfgsbConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
