//! Moneyness conventions.
//!
//! Calibration does not work on raw strikes. Strikes are min-max normalized
//! and shifted into `[0.5, 1.5]` before taking the log, so fitted parameters
//! stay well scaled whatever the absolute price level of the underlying.

use serde::{Deserialize, Serialize};

use crate::error::VolSmileError;

/// Offset added after min-max normalization.
const NORMALIZATION_SHIFT: f64 = 0.5;

/// Convert a strike to log-moneyness: k = ln(K / F).
pub fn log_moneyness(strike: f64, forward: f64) -> f64 {
    (strike / forward).ln()
}

/// Forward price with continuous dividend yield: F = S · exp((r − q) · T).
pub fn forward_price(spot: f64, rate: f64, dividend_yield: f64, expiry: f64) -> f64 {
    spot * ((rate - dividend_yield) * expiry).exp()
}

/// Min-max strike normalization into `[0.5, 1.5]`.
///
/// ```
/// use volsmile::conventions::StrikeNormalization;
///
/// let norm = StrikeNormalization::fit(&[90.0, 100.0, 110.0])?;
/// assert_eq!(norm.normalize(90.0), 0.5);
/// assert_eq!(norm.normalize(110.0), 1.5);
/// assert_eq!(norm.log_moneyness(100.0), 0.0);
/// # Ok::<(), volsmile::VolSmileError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeNormalization {
    min: f64,
    max: f64,
}

impl StrikeNormalization {
    /// Record the strike range of a slice.
    ///
    /// # Errors
    /// Returns [`VolSmileError::InvalidInput`] for an empty slice or any
    /// non-finite strike.
    pub fn fit(strikes: &[f64]) -> crate::error::Result<Self> {
        if strikes.is_empty() {
            return Err(VolSmileError::InvalidInput {
                message: "at least one strike is required for normalization".into(),
            });
        }
        crate::validate::validate_all_finite(strikes, "strikes")?;
        let min = strikes.iter().copied().fold(f64::INFINITY, f64::min);
        let max = strikes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Map a strike into `[0.5, 1.5]`. A degenerate range maps to `1.0`.
    pub fn normalize(&self, strike: f64) -> f64 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 1.0;
        }
        (strike - self.min) / range + NORMALIZATION_SHIFT
    }

    /// Inverse of [`normalize`](Self::normalize).
    pub fn denormalize(&self, x: f64) -> f64 {
        self.min + (x - NORMALIZATION_SHIFT) * (self.max - self.min)
    }

    /// Log of the normalized strike, the abscissa every smile model is fitted on.
    pub fn log_moneyness(&self, strike: f64) -> f64 {
        self.normalize(strike).ln()
    }
}
