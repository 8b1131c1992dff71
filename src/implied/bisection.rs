//! Bisection solver for Barone-Adesi–Whaley implied volatility.
//!
//! The BAW price is increasing in σ, so bisection on a fixed bracket
//! `[vol_lower, vol_upper]` converges whenever the target price is attainable.
//! When it is not, the solver runs out its iteration budget and returns the
//! bracket midpoint, which will sit at one end of the bracket.

use serde::{Deserialize, Serialize};

use crate::pricing::price_american_option;
use crate::types::{MarketParams, OptionType, Quote, Vol};

/// Configuration for the implied vol bisection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpliedVolConfig {
    /// Maximum number of bisection steps.
    pub max_iter: usize,
    /// Tolerance on both the price error and the bracket width.
    pub tol: f64,
    /// Lower end of the volatility bracket.
    pub vol_lower: f64,
    /// Upper end of the volatility bracket.
    pub vol_upper: f64,
}

impl Default for ImpliedVolConfig {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tol: 1e-8,
            vol_lower: 1e-5,
            vol_upper: 10.0,
        }
    }
}

impl ImpliedVolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the volatility bracket.
    #[must_use]
    pub fn with_bracket(mut self, vol_lower: f64, vol_upper: f64) -> Self {
        self.vol_lower = vol_lower;
        self.vol_upper = vol_upper;
        self
    }
}

/// Implied volatility with the default configuration (100 steps, tol 1e-8).
///
/// Argument order follows the usual quoting convention: price first, then
/// spot, strike, rate, expiry and yield.
///
/// ```
/// use volsmile::OptionType;
/// use volsmile::implied::implied_volatility;
/// use volsmile::pricing::price_american_option;
///
/// let price = price_american_option(100.0, 105.0, 0.5, 0.04, 0.25, 0.01, OptionType::Call);
/// let iv = implied_volatility(price, 100.0, 105.0, 0.04, 0.5, 0.01, OptionType::Call);
/// assert!((iv.0 - 0.25).abs() < 1e-6);
/// ```
pub fn implied_volatility(
    price: f64,
    s: f64,
    k: f64,
    r: f64,
    t: f64,
    q: f64,
    side: OptionType,
) -> Vol {
    implied_volatility_with(price, s, k, r, t, q, side, &ImpliedVolConfig::default())
}

/// Implied volatility with an explicit configuration.
#[allow(clippy::too_many_arguments)]
pub fn implied_volatility_with(
    price: f64,
    s: f64,
    k: f64,
    r: f64,
    t: f64,
    q: f64,
    side: OptionType,
    config: &ImpliedVolConfig,
) -> Vol {
    let mut lo = config.vol_lower;
    let mut hi = config.vol_upper;

    for _ in 0..config.max_iter {
        let mid = 0.5 * (lo + hi);
        let model = price_american_option(s, k, t, r, mid, q, side);

        if (model - price).abs() < config.tol {
            return Vol(mid);
        }

        if model > price {
            hi = mid;
        } else {
            lo = mid;
        }

        if hi - lo < config.tol {
            break;
        }
    }

    Vol(0.5 * (lo + hi))
}

/// Bid, mid and ask implied vols of one quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteVols {
    pub strike: f64,
    pub bid: Vol,
    pub mid: Vol,
    pub ask: Vol,
}

impl QuoteVols {
    /// Vol spread `ask − bid`; drives the calibration weight of this strike.
    pub fn spread(&self) -> f64 {
        self.ask.0 - self.bid.0
    }
}

/// Invert the bid, mid and ask prices of a quote.
pub fn quote_vols(quote: &Quote, market: &MarketParams, config: &ImpliedVolConfig) -> QuoteVols {
    let invert = |price: f64| {
        implied_volatility_with(
            price,
            market.spot,
            quote.strike,
            market.rate,
            market.time_to_expiry,
            market.dividend_yield,
            market.side,
            config,
        )
    };
    QuoteVols {
        strike: quote.strike,
        bid: invert(quote.bid),
        mid: invert(quote.mid()),
        ask: invert(quote.ask),
    }
}
