//! Curvature-pair memory and the L-BFGS two-loop recursion.

use std::collections::VecDeque;

use nalgebra::DVector;

/// Pairs with `yᵀs` at or below this are skipped to keep the implicit
/// inverse Hessian positive definite.
const MIN_CURVATURE: f64 = 1e-10;

struct CurvaturePair {
    s: DVector<f64>,
    y: DVector<f64>,
    /// `1 / yᵀs`.
    rho: f64,
}

/// Sliding window of the most recent `(s, y)` pairs, oldest first.
pub(crate) struct CurvatureHistory {
    pairs: VecDeque<CurvaturePair>,
    capacity: usize,
}

impl CurvatureHistory {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            pairs: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Record a step `s` and gradient change `y`.
    ///
    /// Returns `false` (and stores nothing) when `yᵀs ≤ 1e-10`.
    pub(crate) fn push(&mut self, s: DVector<f64>, y: DVector<f64>) -> bool {
        let ys = y.dot(&s);
        if !(ys > MIN_CURVATURE) || self.capacity == 0 {
            return false;
        }
        if self.pairs.len() == self.capacity {
            self.pairs.pop_front();
        }
        self.pairs.push_back(CurvaturePair { s, y, rho: 1.0 / ys });
        true
    }

    /// Search direction `−H·g` from the two-loop recursion, with `H₀ = I`.
    pub(crate) fn direction(&self, grad: &DVector<f64>) -> DVector<f64> {
        let mut q = grad.clone();
        let mut alpha = vec![0.0; self.pairs.len()];

        for (i, pair) in self.pairs.iter().enumerate().rev() {
            alpha[i] = pair.rho * pair.s.dot(&q);
            q.axpy(-alpha[i], &pair.y, 1.0);
        }

        let mut r = q;
        for (i, pair) in self.pairs.iter().enumerate() {
            let beta = pair.rho * pair.y.dot(&r);
            r.axpy(alpha[i] - beta, &pair.s, 1.0);
        }

        -r
    }
}
