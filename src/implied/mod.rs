//! Implied volatility extraction from option prices.
//!
//! Inverts the Barone-Adesi–Whaley pricer ([`crate::pricing`]) by bisection.
//! The solver always returns a value: it favours availability over hard
//! failure, so callers should sanity-check results for degenerate prices
//! (zero price, zero spread, price outside the attainable range).

pub mod bisection;

pub use bisection::{
    ImpliedVolConfig, QuoteVols, implied_volatility, implied_volatility_with, quote_vols,
};
