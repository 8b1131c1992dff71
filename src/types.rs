//! Core domain types for smile extraction.
//!
//! **Outputs use newtypes.** [`Vol`] and [`Strike`] wrap values handed back to
//! callers so a volatility can't silently be used where a strike is expected.
//! **Inputs use bare `f64`**, self-documented by parameter names.
//!
//! These types wrap `f64`, so only `PartialEq` / `PartialOrd` are derived.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VolSmileError;

/// Strike price `K` of an option contract.
///
/// # Examples
/// ```
/// use volsmile::types::Strike;
/// let strike = Strike(100.0);
/// assert_eq!(strike.0, 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Strike(pub f64);

/// Implied volatility `σ`, annualized. A vol of 0.20 is 20%.
///
/// # Examples
/// ```
/// use volsmile::types::Vol;
/// let vol = Vol(0.20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Vol(pub f64);

/// Option side: call or put.
///
/// Parses from the spellings option-chain providers use (`"call"`, `"calls"`,
/// `"c"`, `"put"`, `"puts"`, `"p"`, any case).
///
/// ```
/// use volsmile::OptionType;
/// let side: OptionType = "calls".parse()?;
/// assert_eq!(side, OptionType::Call);
/// assert!("straddle".parse::<OptionType>().is_err());
/// # Ok::<(), volsmile::VolSmileError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Right to buy at strike price.
    Call,
    /// Right to sell at strike price.
    Put,
}

impl FromStr for OptionType {
    type Err = VolSmileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "calls" | "c" => Ok(OptionType::Call),
            "put" | "puts" | "p" => Ok(OptionType::Put),
            _ => Err(VolSmileError::InvalidOptionSide {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => f.write_str("call"),
            OptionType::Put => f.write_str("put"),
        }
    }
}

/// One traded contract at a single expiration.
///
/// `ask >= bid` is typical but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub strike: f64,
    pub bid: f64,
    pub ask: f64,
}

impl Quote {
    pub fn new(strike: f64, bid: f64, ask: f64) -> Self {
        Self { strike, bid, ask }
    }

    /// Mid price `(bid + ask) / 2`.
    pub fn mid(&self) -> f64 {
        0.5 * (self.bid + self.ask)
    }

    /// Bid/ask spread. Negative for crossed quotes.
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}

/// Scalar market inputs shared by every quote of one expiration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    /// Underlying spot price `S`.
    pub spot: f64,
    /// Continuously compounded risk-free rate `r`.
    pub rate: f64,
    /// Continuous dividend yield `q`.
    pub dividend_yield: f64,
    /// Time to expiry `T` in years.
    pub time_to_expiry: f64,
    pub side: OptionType,
}
