//! SLV (simple polynomial) smile: a quartic in log-moneyness.
//!
//! ```text
//! σ(k) = a + b·k + c·k² + d·k³ + e·k⁴
//! ```

use crate::smile::Params;

/// Parameter names in vector order.
pub const PARAM_NAMES: [&str; 5] = ["a", "b", "c", "d", "e"];

/// SLV volatility at log-moneyness `k`.
pub fn vol(k: f64, p: &Params) -> f64 {
    let [a, b, c, d, e] = *p;
    let k2 = k * k;
    a + b * k + c * k2 + d * k2 * k + e * k2 * k2
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn constant_polynomial_is_flat() {
        let p = [0.25, 0.0, 0.0, 0.0, 0.0];
        for k in [-1.0, -0.2, 0.0, 0.3, 2.0] {
            assert_eq!(vol(k, &p), 0.25);
        }
    }

    #[test]
    fn known_value() {
        let p = [0.2, 0.3, 0.1, 0.2, 0.1];
        let k: f64 = -0.1;
        let expected = 0.2 + 0.3 * k + 0.1 * k.powi(2) + 0.2 * k.powi(3) + 0.1 * k.powi(4);
        assert_abs_diff_eq!(vol(k, &p), expected, epsilon = 1e-15);
    }
}
