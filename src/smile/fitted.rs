//! A calibrated smile, queryable in strike space.

use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::conventions::StrikeNormalization;
use crate::error::VolSmileError;
use crate::implied::QuoteVols;
use crate::smile::{ModelKind, Params, SmileDiagnostics};
use crate::types::{Strike, Vol};

/// Grid size used by [`FittedSmile::diagnostics`].
const DIAGNOSTIC_POINTS: usize = 201;

/// Output of [`SmileBuilder::build`](crate::builder::SmileBuilder::build).
///
/// Holds the fitted parameters together with the strike normalization they
/// were fitted under, so queries can be made with plain strikes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedSmile {
    normalization: StrikeNormalization,
    calibration: Calibration,
    points: Vec<QuoteVols>,
}

impl FittedSmile {
    pub(crate) fn new(
        normalization: StrikeNormalization,
        calibration: Calibration,
        points: Vec<QuoteVols>,
    ) -> Self {
        Self {
            normalization,
            calibration,
            points,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.calibration.kind
    }

    pub fn params(&self) -> &Params {
        &self.calibration.params
    }

    pub fn normalization(&self) -> &StrikeNormalization {
        &self.normalization
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Market bid/mid/ask vols the smile was fitted to, in strike order.
    pub fn points(&self) -> &[QuoteVols] {
        &self.points
    }

    /// Model volatility at `strike`.
    ///
    /// Strikes outside the quoted range are extrapolated by the model itself.
    ///
    /// # Errors
    /// Returns [`VolSmileError::InvalidInput`] if `strike` is not finite or
    /// lies so far below the quoted range that its normalized value is not
    /// positive.
    pub fn vol(&self, strike: f64) -> crate::error::Result<Vol> {
        let x = self.normalization.normalize(strike);
        if !strike.is_finite() || x <= 0.0 {
            return Err(VolSmileError::InvalidInput {
                message: format!(
                    "strike {strike} is outside the model domain (normalized value {x})"
                ),
            });
        }
        Ok(Vol(self.kind().vol_at(x.ln(), self.params())))
    }

    /// `n` evenly spaced `(strike, vol)` pairs spanning the quoted strikes.
    pub fn curve(&self, n: usize) -> Vec<(Strike, Vol)> {
        let lo = self.normalization.min();
        let hi = self.normalization.max();
        let kind = self.kind();
        let params = self.params();
        let at = |strike: f64| {
            let k = self.normalization.log_moneyness(strike);
            (Strike(strike), Vol(kind.vol_at(k, params)))
        };
        match n {
            0 => Vec::new(),
            1 => vec![at(lo)],
            _ => {
                let step = (hi - lo) / (n - 1) as f64;
                (0..n)
                    .map(|i| at(if i == n - 1 { hi } else { lo + step * i as f64 }))
                    .collect()
            }
        }
    }

    /// Scan the fitted curve over the normalized range `[0.5, 1.5]`.
    ///
    /// # Errors
    /// Never fails for a smile produced by the builder; the `Result` mirrors
    /// [`SmileDiagnostics::scan`].
    pub fn diagnostics(&self) -> crate::error::Result<SmileDiagnostics> {
        SmileDiagnostics::scan(
            self.kind(),
            self.params(),
            0.5_f64.ln(),
            1.5_f64.ln(),
            DIAGNOSTIC_POINTS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::OptimizeStatus;
    use approx::assert_abs_diff_eq;

    fn smile(kind: ModelKind, params: Params) -> FittedSmile {
        let normalization = StrikeNormalization::fit(&[90.0, 100.0, 110.0]).unwrap();
        let calibration = Calibration {
            kind,
            params,
            objective: 0.0,
            rms_error: 0.0,
            nfev: 1,
            nit: 0,
            status: OptimizeStatus::GradientTolerance,
            message: OptimizeStatus::GradientTolerance.message().into(),
        };
        FittedSmile::new(normalization, calibration, Vec::new())
    }

    #[test]
    fn vol_at_mid_strike_is_level() {
        // Normalized 100 → 1.0 → k = 0.
        let s = smile(ModelKind::Slv, [0.2, 0.1, 0.3, 0.0, 0.0]);
        assert_abs_diff_eq!(s.vol(100.0).unwrap().0, 0.2, epsilon = 1e-15);
    }

    #[test]
    fn vol_uses_normalized_log_strike() {
        let p = [0.2, 0.1, 0.3, 0.0, 0.0];
        let s = smile(ModelKind::Slv, p);
        let k = 0.5_f64.ln();
        assert_abs_diff_eq!(
            s.vol(90.0).unwrap().0,
            ModelKind::Slv.vol_at(k, &p),
            epsilon = 1e-15
        );
    }

    #[test]
    fn vol_extrapolates_inside_domain() {
        let s = smile(ModelKind::Slv, [0.2, 0.0, 0.0, 0.0, 0.0]);
        // Normalized 0.3 is still positive.
        assert!(s.vol(86.0).is_ok());
        assert!(s.vol(200.0).is_ok());
    }

    #[test]
    fn vol_rejects_strikes_outside_domain() {
        let s = smile(ModelKind::Slv, [0.2, 0.0, 0.0, 0.0, 0.0]);
        // Normalized value of 80 is exactly 0.
        assert!(matches!(s.vol(80.0), Err(VolSmileError::InvalidInput { .. })));
        assert!(matches!(s.vol(50.0), Err(VolSmileError::InvalidInput { .. })));
        assert!(matches!(
            s.vol(f64::NAN),
            Err(VolSmileError::InvalidInput { .. })
        ));
    }

    #[test]
    fn curve_spans_quoted_range() {
        let s = smile(ModelKind::Svi, [0.04, 0.4, -0.4, 0.0, 0.1]);
        let c = s.curve(21);
        assert_eq!(c.len(), 21);
        assert_eq!(c[0].0, Strike(90.0));
        assert_eq!(c[20].0, Strike(110.0));
        assert_abs_diff_eq!(c[10].0.0, 100.0, epsilon = 1e-12);
        for (strike, vol) in &c {
            assert_abs_diff_eq!(vol.0, s.vol(strike.0).unwrap().0, epsilon = 1e-15);
        }
    }

    #[test]
    fn curve_small_sizes() {
        let s = smile(ModelKind::Slv, [0.2, 0.0, 0.0, 0.0, 0.0]);
        assert!(s.curve(0).is_empty());
        assert_eq!(s.curve(1), vec![(Strike(90.0), Vol(0.2))]);
    }

    #[test]
    fn diagnostics_flag_rfv_pole_in_range() {
        // Denominator 1 + 2k vanishes at k = −0.5, inside [ln 0.5, ln 1.5].
        let s = smile(ModelKind::Rfv, [0.2, 0.0, 0.0, 2.0, 0.0]);
        assert!(s.diagnostics().unwrap().has_pole());
        let ok = smile(ModelKind::Rfv, [0.2, 0.0, 0.0, 0.0, 0.0]);
        assert!(ok.diagnostics().unwrap().is_clean);
    }

    #[test]
    fn serde_round_trip() {
        let s = smile(ModelKind::Sabr, [0.25, 0.5, 0.5, 0.0, 0.0]);
        let json = serde_json::to_string(&s).unwrap();
        let back: FittedSmile = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
