//! Bound-constrained quasi-Newton optimization.
//!
//! [`minimize`] is a limited-memory BFGS solver with box constraints handled
//! by projection (L-BFGS-B style). It is general purpose: the calibration
//! engine is one caller, but any `f: ℝⁿ → ℝ` with a gradient can be driven
//! through it.
//!
//! Non-convergence is never an error. The solver always hands back its last
//! accepted point together with an [`OptimizeStatus`].

mod history;
pub mod lbfgsb;
pub(crate) mod serde_bounds;

pub use lbfgsb::{LbfgsbConfig, MinimizeResult, OptimizeStatus, minimize};

/// Closed interval `[lo, hi]` for one variable; infinite ends mean unbounded.
pub type Bound = (f64, f64);

/// `(−∞, ∞)` for each of `n` variables.
pub fn unbounded(n: usize) -> Vec<Bound> {
    vec![(f64::NEG_INFINITY, f64::INFINITY); n]
}
