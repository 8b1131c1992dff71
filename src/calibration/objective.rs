//! Weighted least-squares objective and its finite-difference gradient.

use nalgebra::DVector;

use crate::calibration::SmileData;
use crate::smile::{ModelKind, N_PARAMS, Params};

/// `Σ wᵢ·(model(kᵢ; θ) − midᵢ)²` with `wᵢ = 1/(askᵢ − bidᵢ + ε)`.
///
/// Tight bid/ask spreads carry the most weight; a zero-spread point gets
/// `1/ε` and effectively pins the fit.
pub(crate) struct WeightedObjective<'a> {
    kind: ModelKind,
    k: &'a [f64],
    mid: &'a [f64],
    weights: Vec<f64>,
    reject_non_finite: bool,
}

impl<'a> WeightedObjective<'a> {
    pub(crate) fn new(
        kind: ModelKind,
        data: &'a SmileData,
        weight_epsilon: f64,
        reject_non_finite: bool,
    ) -> Self {
        let weights = data
            .bid
            .iter()
            .zip(&data.ask)
            .map(|(&bid, &ask)| 1.0 / (ask - bid + weight_epsilon))
            .collect();
        Self {
            kind,
            k: &data.k,
            mid: &data.mid,
            weights,
            reject_non_finite,
        }
    }

    pub(crate) fn value(&self, params: &Params) -> f64 {
        let mut sum = 0.0;
        for ((&k, &mid), &w) in self.k.iter().zip(self.mid).zip(&self.weights) {
            let model = self.kind.vol_at(k, params);
            if self.reject_non_finite && !model.is_finite() {
                return f64::INFINITY;
            }
            let r = model - mid;
            sum += w * r * r;
        }
        sum
    }

    /// Objective value, with forward differences written into `grad`.
    ///
    /// Each parameter is bumped by `fd_epsilon` in turn; the unbumped value is
    /// shared across all five differences.
    pub(crate) fn value_and_gradient(
        &self,
        x: &DVector<f64>,
        grad: &mut DVector<f64>,
        fd_epsilon: f64,
    ) -> f64 {
        let params = to_params(x);
        let f = self.value(&params);
        for i in 0..N_PARAMS {
            let mut bumped = params;
            bumped[i] += fd_epsilon;
            grad[i] = (self.value(&bumped) - f) / fd_epsilon;
        }
        f
    }
}

pub(crate) fn to_params(x: &DVector<f64>) -> Params {
    let mut p = [0.0; N_PARAMS];
    for (pi, xi) in p.iter_mut().zip(x.iter()) {
        *pi = *xi;
    }
    p
}

/// Root-mean-square of unweighted residuals.
pub(crate) fn rms_error(kind: ModelKind, data: &SmileData, params: &Params) -> f64 {
    if data.k.is_empty() {
        return 0.0;
    }
    let sse: f64 = data
        .k
        .iter()
        .zip(&data.mid)
        .map(|(&k, &mid)| (kind.vol_at(k, params) - mid).powi(2))
        .sum();
    (sse / data.k.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn data() -> SmileData {
        SmileData::new(
            vec![-0.1, 0.0, 0.1],
            vec![0.22, 0.20, 0.23],
            vec![0.21, 0.19, 0.22],
            vec![0.23, 0.21, 0.24],
        )
        .unwrap()
    }

    #[test]
    fn perfect_fit_has_zero_objective() {
        let d = data();
        let obj = WeightedObjective::new(ModelKind::Slv, &d, 1e-8, true);
        // SLV through (−0.1, 0.22), (0, 0.20), (0.1, 0.23): b = 0.05, c = 2.5
        let p = [0.20, 0.05, 2.5, 0.0, 0.0];
        assert_abs_diff_eq!(obj.value(&p), 0.0, epsilon = 1e-20);
    }

    #[test]
    fn weights_follow_spread() {
        let d = SmileData::new(
            vec![0.0, 0.0],
            vec![0.3, 0.3],
            vec![0.29, 0.2],
            vec![0.31, 0.4],
        )
        .unwrap();
        let obj = WeightedObjective::new(ModelKind::Slv, &d, 1e-8, true);
        assert!(obj.weights[0] > obj.weights[1]);
        assert_abs_diff_eq!(obj.weights[1], 1.0 / (0.2 + 1e-8), epsilon = 1e-9);
    }

    #[test]
    fn zero_spread_gets_inverse_epsilon_weight() {
        let d = SmileData::new(vec![0.0], vec![0.2], vec![0.2], vec![0.2]).unwrap();
        let obj = WeightedObjective::new(ModelKind::Slv, &d, 1e-8, true);
        assert_abs_diff_eq!(obj.weights[0], 1e8, epsilon = 1e-6);
    }

    #[test]
    fn gradient_matches_analytic_for_slv() {
        let d = data();
        let obj = WeightedObjective::new(ModelKind::Slv, &d, 1e-8, true);
        let p = [0.2, 0.3, 0.1, 0.2, 0.1];
        let x = DVector::from_column_slice(&p);
        let mut grad = DVector::zeros(N_PARAMS);
        let f = obj.value_and_gradient(&x, &mut grad, 1e-8);
        assert_eq!(f, obj.value(&p));

        // ∂f/∂θⱼ = Σ 2wᵢ rᵢ kᵢʲ for the polynomial model.
        for j in 0..N_PARAMS {
            let analytic: f64 = (0..3)
                .map(|i| {
                    let r = ModelKind::Slv.vol_at(d.k[i], &p) - d.mid[i];
                    2.0 * obj.weights[i] * r * d.k[i].powi(j as i32)
                })
                .sum();
            assert_abs_diff_eq!(grad[j], analytic, epsilon = 1e-3);
        }
    }

    #[test]
    fn pole_is_rejected_when_enabled() {
        let d = SmileData::new(vec![0.5], vec![0.2], vec![0.19], vec![0.21]).unwrap();
        let p = [0.2, 0.0, 0.0, -2.0, 0.0];
        let strict = WeightedObjective::new(ModelKind::Rfv, &d, 1e-8, true);
        assert_eq!(strict.value(&p), f64::INFINITY);
        let lax = WeightedObjective::new(ModelKind::Rfv, &d, 1e-8, false);
        assert!(!lax.value(&p).is_finite());
    }

    #[test]
    fn rms_of_constant_offset() {
        let d = data();
        let p = [0.20 + 0.01, 0.05, 2.5, 0.0, 0.0];
        assert_abs_diff_eq!(rms_error(ModelKind::Slv, &d, &p), 0.01, epsilon = 1e-12);
    }
}
