//! SABR-style quartic smile.
//!
//! Not the Hagan asymptotic expansion. The model is a quartic in
//! log-moneyness scaled by an ATM level, with the five coefficients named
//! after the SABR parameters they loosely play the role of:
//!
//! ```text
//! σ(k) = α·(1 + β·k + ρ·k² + ν·k³ + f₀·k⁴)
//! ```
//!
//! Unlike [`slv`](crate::smile::slv) the level multiplies every term, so the
//! shape coefficients are relative to the ATM vol `α`.

use crate::smile::Params;

/// Parameter names in vector order.
pub const PARAM_NAMES: [&str; 5] = ["alpha", "beta", "rho", "nu", "f0"];

/// Quartic SABR volatility at log-moneyness `k`.
pub fn vol(k: f64, p: &Params) -> f64 {
    let [alpha, beta, rho, nu, f0] = *p;
    let k2 = k * k;
    alpha * (1.0 + beta * k + rho * k2 + nu * k2 * k + f0 * k2 * k2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const P: Params = [0.2, 0.5, -0.3, 0.4, 0.1];

    #[test]
    fn atm_is_alpha() {
        assert_eq!(vol(0.0, &P), 0.2);
    }

    #[test]
    fn alpha_scales_whole_curve() {
        let doubled = [0.4, 0.5, -0.3, 0.4, 0.1];
        for k in [-0.4, -0.1, 0.2, 0.6] {
            assert_abs_diff_eq!(vol(k, &doubled), 2.0 * vol(k, &P), epsilon = 1e-15);
        }
    }

    #[test]
    fn known_value() {
        let k: f64 = 0.3;
        let expected =
            0.2 * (1.0 + 0.5 * k - 0.3 * k.powi(2) + 0.4 * k.powi(3) + 0.1 * k.powi(4));
        assert_abs_diff_eq!(vol(k, &P), expected, epsilon = 1e-15);
    }

    #[test]
    fn zero_alpha_is_flat_zero() {
        let p = [0.0, 0.5, -0.3, 0.4, 0.1];
        assert_eq!(vol(0.7, &p), 0.0);
    }
}
