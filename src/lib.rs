//! # volsmile
//!
//! Single-expiry implied volatility smiles for American options.
//!
//! Provides the pipeline: option quotes → American-style implied vols →
//! calibrated smile model → queryable curve.
//!
//! ## Architecture
//!
//! - **`pricing`** — Barone-Adesi–Whaley American pricer and Black–Scholes European price
//! - **`implied`** — Bisection implied volatility solver
//! - **`smile`** — Five-parameter smile models (RFV, SLV, SABR, SVI) and shape diagnostics
//! - **`calibration`** — Spread-weighted least-squares fitting of a smile model
//! - **`optim`** — Bound-constrained L-BFGS-B minimizer
//! - **`builder`** — Quotes in, [`FittedSmile`] out
//!
//! ## Design
//!
//! - **Newtypes for outputs, bare `f64` for inputs.** [`Vol`] and [`Strike`]
//!   wrap return values; inputs take raw `f64`.
//! - **No panics.** Every fallible operation returns [`Result`]. Library code
//!   never calls `unwrap()` or `expect()`. Optimizer non-convergence is a
//!   status, not an error.
//! - **Pure and thread-safe.** Nothing holds global state. Independent
//!   calibrations and quote inversions run on rayon with the `parallel`
//!   feature.
//! - **Serializable.** Value types, configs and fit results implement Serde
//!   `Serialize` / `Deserialize`.

pub mod builder;
pub mod calibration;
pub mod conventions;
pub mod error;
pub mod implied;
pub mod optim;
pub mod pricing;
pub mod smile;
pub mod types;
mod validate;

#[doc(inline)]
pub use builder::SmileBuilder;
#[doc(inline)]
pub use error::{Result, VolSmileError};
#[doc(inline)]
pub use smile::{FittedSmile, ModelKind};
#[doc(inline)]
pub use types::{MarketParams, OptionType, Quote, Strike, Vol};
