//! Single-expiry volatility smile models.
//!
//! Every model is a pure map from log-moneyness `k` and a 5-parameter vector
//! to a volatility. Models are selected by the [`ModelKind`] tag; there is no
//! trait object or per-model state.
//!
//! ## Models
//!
//! - [`ModelKind::Rfv`] — rational function, `(a + bk + ck²)/(1 + dk + ek²)`
//! - [`ModelKind::Slv`] — quartic polynomial
//! - [`ModelKind::Sabr`] — SABR-flavoured quartic scaled by an ATM level
//! - [`ModelKind::Svi`] — raw SVI shape applied to volatility
//!
//! No parameter domain is validated during evaluation.

pub mod diagnostics;
pub mod fitted;
pub mod rfv;
pub mod sabr;
pub mod slv;
pub mod svi;

pub use diagnostics::{SmileDiagnostics, SmileIssue};
pub use fitted::FittedSmile;
pub use svi::SviParams;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VolSmileError;

/// Number of parameters shared by every model.
pub const N_PARAMS: usize = 5;

/// Parameter vector. Meaning depends on the [`ModelKind`].
pub type Params = [f64; N_PARAMS];

/// Smile model selector.
///
/// ```
/// use volsmile::smile::ModelKind;
///
/// let kind: ModelKind = "svi".parse()?;
/// assert_eq!(kind, ModelKind::Svi);
/// assert_eq!(kind.to_string(), "SVI");
/// assert_eq!(kind.param_names()[2], "rho");
/// # Ok::<(), volsmile::VolSmileError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModelKind {
    Rfv,
    Slv,
    Sabr,
    Svi,
}

impl ModelKind {
    /// All model kinds, in display order.
    pub const ALL: [ModelKind; 4] = [ModelKind::Rfv, ModelKind::Slv, ModelKind::Sabr, ModelKind::Svi];

    /// Short upper-case model name ("RFV", "SLV", "SABR", "SVI").
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Rfv => "RFV",
            ModelKind::Slv => "SLV",
            ModelKind::Sabr => "SABR",
            ModelKind::Svi => "SVI",
        }
    }

    /// Names of the five parameters in vector order.
    pub fn param_names(self) -> [&'static str; N_PARAMS] {
        match self {
            ModelKind::Rfv => rfv::PARAM_NAMES,
            ModelKind::Slv => slv::PARAM_NAMES,
            ModelKind::Sabr => sabr::PARAM_NAMES,
            ModelKind::Svi => svi::PARAM_NAMES,
        }
    }

    /// Volatility at a single log-moneyness.
    pub fn vol_at(self, k: f64, params: &Params) -> f64 {
        match self {
            ModelKind::Rfv => rfv::vol(k, params),
            ModelKind::Slv => slv::vol(k, params),
            ModelKind::Sabr => sabr::vol(k, params),
            ModelKind::Svi => svi::vol(k, params),
        }
    }

    /// Elementwise evaluation over a slice of log-moneyness values.
    pub fn evaluate(self, k: &[f64], params: &Params) -> Vec<f64> {
        k.iter().map(|&ki| self.vol_at(ki, params)).collect()
    }

    /// Parameter box matching the model's conventional domain.
    ///
    /// Calibration is unbounded by default; pass these to
    /// [`CalibrationConfig::with_bounds`](crate::calibration::CalibrationConfig::with_bounds)
    /// to opt in. RFV and SLV have no natural domain and are fully unbounded.
    pub fn natural_bounds(self) -> [(f64, f64); N_PARAMS] {
        const FREE: (f64, f64) = (f64::NEG_INFINITY, f64::INFINITY);
        match self {
            ModelKind::Rfv | ModelKind::Slv => [FREE; N_PARAMS],
            ModelKind::Sabr => [(0.0, f64::INFINITY), FREE, FREE, FREE, FREE],
            ModelKind::Svi => [
                FREE,
                (0.0, f64::INFINITY),
                (-0.999, 0.999),
                FREE,
                (1e-6, f64::INFINITY),
            ],
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = VolSmileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RFV" => Ok(ModelKind::Rfv),
            "SLV" => Ok(ModelKind::Slv),
            "SABR" => Ok(ModelKind::Sabr),
            "SVI" => Ok(ModelKind::Svi),
            other => Err(VolSmileError::InvalidInput {
                message: format!("unknown smile model {other:?}, expected RFV, SLV, SABR or SVI"),
            }),
        }
    }
}

/// Evaluate a smile model over a slice of log-moneyness values.
///
/// ```
/// use volsmile::smile::{ModelKind, evaluate_model};
///
/// let vols = evaluate_model(ModelKind::Slv, &[-0.1, 0.0, 0.1], &[0.2, 0.0, 1.0, 0.0, 0.0]);
/// assert_eq!(vols.len(), 3);
/// assert_eq!(vols[1], 0.2);
/// ```
pub fn evaluate_model(kind: ModelKind, k: &[f64], params: &Params) -> Vec<f64> {
    kind.evaluate(k, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUESS: Params = [0.2, 0.3, 0.1, 0.2, 0.1];

    #[test]
    fn evaluate_preserves_length() {
        let k = [-0.4, -0.2, 0.0, 0.2, 0.4];
        for kind in ModelKind::ALL {
            assert_eq!(evaluate_model(kind, &k, &GUESS).len(), k.len());
        }
        assert!(evaluate_model(ModelKind::Svi, &[], &GUESS).is_empty());
    }

    #[test]
    fn evaluate_is_bitwise_deterministic() {
        let k: Vec<f64> = (0..50).map(|i| -0.7 + 0.03 * i as f64).collect();
        for kind in ModelKind::ALL {
            let a = evaluate_model(kind, &k, &GUESS);
            let b = evaluate_model(kind, &k, &GUESS);
            let a_bits: Vec<u64> = a.iter().map(|v| v.to_bits()).collect();
            let b_bits: Vec<u64> = b.iter().map(|v| v.to_bits()).collect();
            assert_eq!(a_bits, b_bits, "{kind} not deterministic");
        }
    }

    #[test]
    fn evaluate_matches_vol_at() {
        let k = [-0.3, 0.05, 0.25];
        for kind in ModelKind::ALL {
            let v = kind.evaluate(&k, &GUESS);
            for (i, &ki) in k.iter().enumerate() {
                assert_eq!(v[i], kind.vol_at(ki, &GUESS));
            }
        }
    }

    #[test]
    fn models_differ_on_same_params() {
        let k = 0.3;
        let vols: Vec<f64> = ModelKind::ALL.iter().map(|m| m.vol_at(k, &GUESS)).collect();
        for i in 0..vols.len() {
            for j in (i + 1)..vols.len() {
                assert_ne!(vols[i], vols[j]);
            }
        }
    }

    #[test]
    fn parse_and_display() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.to_string().parse::<ModelKind>().unwrap(), kind);
            assert_eq!(kind.name().to_lowercase().parse::<ModelKind>().unwrap(), kind);
        }
        assert!(matches!(
            "heston".parse::<ModelKind>(),
            Err(VolSmileError::InvalidInput { .. })
        ));
    }

    #[test]
    fn serde_uses_upper_case_names() {
        let json = serde_json::to_string(&ModelKind::Sabr).unwrap();
        assert_eq!(json, "\"SABR\"");
        let back: ModelKind = serde_json::from_str("\"RFV\"").unwrap();
        assert_eq!(back, ModelKind::Rfv);
    }

    #[test]
    fn natural_bounds_contain_default_guess() {
        for kind in ModelKind::ALL {
            for (x, (lo, hi)) in GUESS.iter().zip(kind.natural_bounds()) {
                assert!(lo <= *x && *x <= hi, "{kind}: {x} outside [{lo}, {hi}]");
            }
        }
    }
}
