//! Shape checks for a calibrated smile.
//!
//! None of the models constrain their output. A fit can go negative in the
//! wings, and RFV can place a pole (zero denominator) between quoted strikes
//! where the objective never sees it. [`SmileDiagnostics::scan`] samples the
//! curve on a uniform log-moneyness grid and reports what it finds.

use serde::{Deserialize, Serialize};

use crate::error::VolSmileError;
use crate::smile::{ModelKind, Params, rfv};
use crate::validate::validate_finite;

/// `|denominator|` below which an RFV grid point counts as near a pole.
pub const NEAR_POLE_THRESHOLD: f64 = 1e-6;

/// A single shape problem found on the scan grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SmileIssue {
    /// Model output is NaN or infinite.
    NonFinite { k: f64 },
    /// Model output is below zero.
    NegativeVol { k: f64, vol: f64 },
    /// RFV denominator changes sign between two neighbouring grid points.
    PoleCrossing { k_left: f64, k_right: f64 },
    /// RFV denominator is within [`NEAR_POLE_THRESHOLD`] of zero.
    NearPole { k: f64, denominator: f64 },
}

/// Result of scanning a smile over `[k_lo, k_hi]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmileDiagnostics {
    /// Whether no issue was found.
    pub is_clean: bool,
    /// Smallest finite vol seen on the grid, if any.
    pub min_vol: Option<f64>,
    pub issues: Vec<SmileIssue>,
}

impl SmileDiagnostics {
    /// Report with nothing to flag.
    pub fn clean() -> Self {
        Self {
            is_clean: true,
            min_vol: None,
            issues: Vec::new(),
        }
    }

    /// Sample `n` evenly spaced points on `[k_lo, k_hi]`, endpoints included.
    ///
    /// ```
    /// use volsmile::smile::{ModelKind, SmileDiagnostics, SmileIssue};
    ///
    /// // 1 − 2k vanishes at k = 0.5
    /// let params = [0.2, 0.0, 0.0, -2.0, 0.0];
    /// let report = SmileDiagnostics::scan(ModelKind::Rfv, &params, 0.0, 1.0, 10)?;
    /// assert!(!report.is_clean);
    /// assert!(report.issues.iter().any(|i| matches!(i, SmileIssue::PoleCrossing { .. })));
    /// # Ok::<(), volsmile::VolSmileError>(())
    /// ```
    ///
    /// # Errors
    /// Returns [`VolSmileError::InvalidInput`] if the range is not finite and
    /// increasing, or `n < 2`.
    pub fn scan(
        kind: ModelKind,
        params: &Params,
        k_lo: f64,
        k_hi: f64,
        n: usize,
    ) -> crate::error::Result<Self> {
        validate_finite(k_lo, "k_lo")?;
        validate_finite(k_hi, "k_hi")?;
        if k_lo >= k_hi {
            return Err(VolSmileError::InvalidInput {
                message: format!("scan range must be increasing, got [{k_lo}, {k_hi}]"),
            });
        }
        if n < 2 {
            return Err(VolSmileError::InvalidInput {
                message: format!("scan needs at least 2 points, got {n}"),
            });
        }

        let step = (k_hi - k_lo) / (n - 1) as f64;
        let mut issues = Vec::new();
        let mut min_vol: Option<f64> = None;
        let mut prev_den: Option<(f64, f64)> = None;

        for i in 0..n {
            let k = if i == n - 1 { k_hi } else { k_lo + step * i as f64 };
            let vol = kind.vol_at(k, params);

            if !vol.is_finite() {
                issues.push(SmileIssue::NonFinite { k });
            } else {
                min_vol = Some(min_vol.map_or(vol, |m| m.min(vol)));
                if vol < 0.0 {
                    issues.push(SmileIssue::NegativeVol { k, vol });
                }
            }

            if kind == ModelKind::Rfv {
                let (_, den) = rfv::parts(k, params);
                if den.abs() < NEAR_POLE_THRESHOLD {
                    issues.push(SmileIssue::NearPole { k, denominator: den });
                }
                if let Some((k_prev, den_prev)) = prev_den
                    && den_prev * den < 0.0
                {
                    issues.push(SmileIssue::PoleCrossing {
                        k_left: k_prev,
                        k_right: k,
                    });
                }
                prev_den = Some((k, den));
            }
        }

        Ok(Self {
            is_clean: issues.is_empty(),
            min_vol,
            issues,
        })
    }

    /// Combine two reports, e.g. from adjacent ranges.
    pub fn merge(&self, other: &SmileDiagnostics) -> SmileDiagnostics {
        let mut issues = self.issues.clone();
        issues.extend(other.issues.iter().copied());
        let min_vol = match (self.min_vol, other.min_vol) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        SmileDiagnostics {
            is_clean: self.is_clean && other.is_clean,
            min_vol,
            issues,
        }
    }

    /// Whether any pole (crossing or near-zero denominator) was found.
    pub fn has_pole(&self) -> bool {
        self.issues.iter().any(|i| {
            matches!(
                i,
                SmileIssue::PoleCrossing { .. } | SmileIssue::NearPole { .. }
            )
        })
    }
}
