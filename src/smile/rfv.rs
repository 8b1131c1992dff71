//! RFV (rational function volatility) smile.
//!
//! ```text
//! σ(k) = (a + b·k + c·k²) / (1 + d·k + e·k²)
//! ```
//!
//! The denominator can vanish for real `k` when `d² > 4e`; the curve then
//! has poles. Nothing here guards against that. See
//! [`SmileDiagnostics`](crate::smile::SmileDiagnostics) for detection.

use crate::smile::Params;

/// Parameter names in vector order.
pub const PARAM_NAMES: [&str; 5] = ["a", "b", "c", "d", "e"];

/// Numerator and denominator of the rational form.
pub(crate) fn parts(k: f64, p: &Params) -> (f64, f64) {
    let [a, b, c, d, e] = *p;
    (a + b * k + c * k * k, 1.0 + d * k + e * k * k)
}

/// RFV volatility at log-moneyness `k`.
pub fn vol(k: f64, p: &Params) -> f64 {
    let (num, den) = parts(k, p);
    num / den
}
