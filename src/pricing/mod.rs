//! Option pricing used by implied vol extraction.
//!
//! - [`normal`] — error function and standard normal CDF (Abramowitz–Stegun)
//! - [`baw`] — Barone-Adesi–Whaley American option approximation

pub mod baw;
pub mod normal;

pub use baw::{european_price, price_american_option};
pub use normal::{erf, norm_cdf};
