//! Barone-Adesi–Whaley (1987) American option approximation.
//!
//! The American price is the European Black-Scholes-Merton price plus an
//! early-exercise premium `A₂·(S/S*)^q₂`, where `S*` is the critical
//! underlying price beyond which immediate exercise is optimal:
//!
//! ```text
//! M  = 2(r − q)/σ²
//! n  = 2(r − q − σ²/2)/σ²
//! q₂ = (−(n − 1) − √((n − 1)² + 4M)) / 2
//! ```
//!
//! When `q ≥ r` or `q₂ < 0` the premium is dropped and the European price is
//! returned unchanged.
//!
//! No input validation happens here: `σ → 0` or `T → 0` produce NaN/∞ that
//! propagate to the caller. The implied vol solver only ever calls this with
//! `σ ∈ [1e-5, 10]`.
//!
//! # References
//! - Barone-Adesi, G. & Whaley, R. "Efficient Analytic Approximation of
//!   American Option Values" (1987)

use crate::pricing::normal::norm_cdf;
use crate::types::OptionType;

/// Black-Scholes-Merton `d1` and `d2`.
fn d1_d2(s: f64, k: f64, t: f64, r: f64, sigma: f64, q: f64) -> (f64, f64) {
    let sig_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// European option price under Black-Scholes-Merton with continuous yield `q`.
///
/// ```
/// use volsmile::OptionType;
/// use volsmile::pricing::european_price;
///
/// let call = european_price(100.0, 100.0, 1.0, 0.05, 0.2, 0.0, OptionType::Call);
/// assert!((call - 10.4506).abs() < 1e-3);
/// ```
pub fn european_price(
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    sigma: f64,
    q: f64,
    side: OptionType,
) -> f64 {
    let (d1, d2) = d1_d2(s, k, t, r, sigma, q);
    let df_q = (-q * t).exp();
    let df_r = (-r * t).exp();
    match side {
        OptionType::Call => s * df_q * norm_cdf(d1) - k * df_r * norm_cdf(d2),
        OptionType::Put => k * df_r * norm_cdf(-d2) - s * df_q * norm_cdf(-d1),
    }
}

/// The `q₂` exponent of the BAW quadratic.
fn q2_exponent(r: f64, sigma: f64, q: f64) -> f64 {
    let var = sigma * sigma;
    let m = 2.0 * (r - q) / var;
    let n = 2.0 * (r - q - 0.5 * var) / var;
    (-(n - 1.0) - ((n - 1.0).powi(2) + 4.0 * m).sqrt()) / 2.0
}

/// Apply the early-exercise premium to a European price.
///
/// Requires `q₂ ≥ 0`; the caller has already handled the European fallback.
fn with_early_exercise(european: f64, s: f64, k: f64, q2: f64, side: OptionType) -> f64 {
    match side {
        OptionType::Call => {
            let s_crit = k / (1.0 - 1.0 / q2);
            if s >= s_crit {
                s - k
            } else {
                let a2 = (s_crit - k) * s_crit.powf(-q2);
                european + a2 * (s / s_crit).powf(q2)
            }
        }
        OptionType::Put => {
            let s_crit = k / (1.0 + 1.0 / q2);
            if s <= s_crit {
                k - s
            } else {
                let a2 = (k - s_crit) * s_crit.powf(-q2);
                european + a2 * (s / s_crit).powf(q2)
            }
        }
    }
}

/// Price an American option with the Barone-Adesi–Whaley approximation.
///
/// # Arguments
/// * `s` — Spot price
/// * `k` — Strike
/// * `t` — Time to expiry in years (must be > 0 for a finite result)
/// * `r` — Risk-free rate
/// * `sigma` — Volatility (must be > 0 for a finite result)
/// * `q` — Continuous dividend yield
/// * `side` — Call or Put
///
/// ```
/// use volsmile::OptionType;
/// use volsmile::pricing::{european_price, price_american_option};
///
/// let (s, k, t, r, sigma, q) = (566.345, 570.0, 0.0157, 0.0486, 0.12, 0.0035);
/// let american = price_american_option(s, k, t, r, sigma, q, OptionType::Call);
/// let european = european_price(s, k, t, r, sigma, q, OptionType::Call);
/// assert_eq!(american, european);
/// ```
pub fn price_american_option(
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    sigma: f64,
    q: f64,
    side: OptionType,
) -> f64 {
    let european = european_price(s, k, t, r, sigma, q, side);
    let q2 = q2_exponent(r, sigma, q);

    if q >= r || q2 < 0.0 {
        return european;
    }

    with_early_exercise(european, s, k, q2, side)
}
