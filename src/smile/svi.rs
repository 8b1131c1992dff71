//! SVI (Stochastic Volatility Inspired) smile.
//!
//! Uses the raw SVI shape, applied directly to volatility rather than to
//! total variance:
//!
//! ```text
//! σ(k) = a + b·[ρ(k − m) + √((k − m)² + σ²)]
//! ```
//!
//! The usual Gatheral-Jacquier domain (`b ≥ 0`, `|ρ| < 1`, `σ > 0`) is not
//! enforced during evaluation. [`SviParams::is_well_posed`] checks it and
//! [`ModelKind::natural_bounds`](crate::smile::ModelKind::natural_bounds)
//! can impose it on a calibration.
//!
//! # References
//! - Gatheral, J. "The Volatility Surface: A Practitioner's Guide" (2006)
//! - Gatheral, J. & Jacquier, A. "Arbitrage-free SVI Volatility Surfaces" (2014)

use serde::{Deserialize, Serialize};

use crate::smile::Params;

/// Parameter names in vector order.
pub const PARAM_NAMES: [&str; 5] = ["a", "b", "rho", "m", "sigma"];

/// SVI volatility at log-moneyness `k`.
pub fn vol(k: f64, p: &Params) -> f64 {
    let [a, b, rho, m, sigma] = *p;
    let dk = k - m;
    a + b * (rho * dk + (dk * dk + sigma * sigma).sqrt())
}

/// Named view of an SVI parameter vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SviParams {
    /// Level.
    pub a: f64,
    /// Slope (controls the wings).
    pub b: f64,
    /// Skew direction.
    pub rho: f64,
    /// Horizontal shift.
    pub m: f64,
    /// Curvature at the vertex.
    pub sigma: f64,
}

impl SviParams {
    pub fn from_params(p: &Params) -> Self {
        let [a, b, rho, m, sigma] = *p;
        Self {
            a,
            b,
            rho,
            m,
            sigma,
        }
    }

    pub fn to_params(&self) -> Params {
        [self.a, self.b, self.rho, self.m, self.sigma]
    }

    /// Minimum of the curve, `a + b·|σ|·√(1 − ρ²)`, reached at
    /// `k = m − ρ|σ|/√(1 − ρ²)`. Only meaningful when well posed.
    pub fn min_vol(&self) -> f64 {
        self.a + self.b * self.sigma.abs() * (1.0 - self.rho * self.rho).sqrt()
    }

    /// `b ≥ 0`, `|ρ| < 1`, `σ > 0` and a non-negative minimum.
    pub fn is_well_posed(&self) -> bool {
        self.b >= 0.0
            && self.rho.abs() < 1.0
            && self.sigma > 0.0
            && self.m.is_finite()
            && self.min_vol() >= 0.0
    }
}
