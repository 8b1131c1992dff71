//! Standard normal distribution helpers.

/// Error function, Abramowitz & Stegun formula 7.1.26.
///
/// Maximum absolute error is about 1.5e-7. Odd by construction:
/// `erf(-x) == -erf(x)` bitwise.
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    sign * y
}

/// Standard normal CDF, `P(Z ≤ x)`.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn erf_known_values() {
        // Reference values from A&S Table 7.1.
        assert_abs_diff_eq!(erf(0.5), 0.520_499_877_8, epsilon = 2e-7);
        assert_abs_diff_eq!(erf(1.0), 0.842_700_792_9, epsilon = 2e-7);
        assert_abs_diff_eq!(erf(2.0), 0.995_322_265_0, epsilon = 2e-7);
    }

    #[test]
    fn erf_zero_is_near_zero() {
        assert_abs_diff_eq!(erf(0.0), 0.0, epsilon = 2e-7);
    }

    #[test]
    fn erf_is_odd() {
        for x in [0.1, 0.7, 1.3, 2.9, 5.0] {
            assert_eq!(erf(-x), -erf(x));
        }
    }

    #[test]
    fn norm_cdf_symmetry_and_tails() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-7);
        assert_abs_diff_eq!(norm_cdf(1.0) + norm_cdf(-1.0), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(norm_cdf(1.959_964), 0.975, epsilon = 2e-7);
        assert!(norm_cdf(10.0) <= 1.0);
        assert!(norm_cdf(-10.0) >= 0.0);
    }
}
