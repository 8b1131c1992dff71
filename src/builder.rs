//! End-to-end smile construction from option quotes.
//!
//! ```
//! use volsmile::builder::SmileBuilder;
//! use volsmile::pricing::price_american_option;
//! use volsmile::smile::ModelKind;
//! use volsmile::{OptionType, Quote};
//!
//! let (spot, rate, q, t) = (100.0, 0.05, 0.01, 0.5);
//! let quotes: Vec<Quote> = [85.0, 90.0, 95.0, 100.0, 105.0, 110.0, 115.0]
//!     .iter()
//!     .map(|&k| {
//!         let p = price_american_option(spot, k, t, rate, 0.25, q, OptionType::Call);
//!         Quote::new(k, 0.99 * p, 1.01 * p)
//!     })
//!     .collect();
//!
//! let smile = SmileBuilder::new()
//!     .spot(spot)
//!     .rate(rate)
//!     .dividend_yield(q)
//!     .expiry(t)
//!     .side(OptionType::Call)
//!     .model(ModelKind::Slv)
//!     .quotes(&quotes)
//!     .build()?;
//!
//! assert!((smile.vol(100.0)?.0 - 0.25).abs() < 0.01);
//! # Ok::<(), volsmile::VolSmileError>(())
//! ```

use crate::calibration::{CalibrationConfig, SmileCalibrator, SmileData};
use crate::conventions::StrikeNormalization;
use crate::error::VolSmileError;
use crate::implied::{ImpliedVolConfig, QuoteVols, quote_vols};
use crate::smile::{FittedSmile, ModelKind};
use crate::types::{MarketParams, OptionType, Quote};
use crate::validate::{validate_finite, validate_positive};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Builder for a single-expiry [`FittedSmile`].
///
/// Accumulates market parameters and quotes, then filters the quotes,
/// inverts them to implied vols and calibrates the chosen model.
///
/// Spot, rate, expiry and side are required. Dividend yield defaults to 0,
/// the model to [`ModelKind::Svi`], and zero-bid quotes are skipped.
#[derive(Debug)]
pub struct SmileBuilder {
    spot: Option<f64>,
    rate: Option<f64>,
    dividend_yield: Option<f64>,
    expiry: Option<f64>,
    side: Option<OptionType>,
    model: ModelKind,
    quotes: Vec<Quote>,
    skip_zero_bid: bool,
    implied_config: ImpliedVolConfig,
    calibration_config: CalibrationConfig,
}

impl SmileBuilder {
    pub fn new() -> Self {
        Self {
            spot: None,
            rate: None,
            dividend_yield: None,
            expiry: None,
            side: None,
            model: ModelKind::Svi,
            quotes: Vec::new(),
            skip_zero_bid: true,
            implied_config: ImpliedVolConfig::default(),
            calibration_config: CalibrationConfig::default(),
        }
    }

    /// Set spot, rate, dividend yield, expiry and side at once.
    pub fn market(self, market: MarketParams) -> Self {
        self.spot(market.spot)
            .rate(market.rate)
            .dividend_yield(market.dividend_yield)
            .expiry(market.time_to_expiry)
            .side(market.side)
    }

    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Continuous dividend yield. Default is 0.
    pub fn dividend_yield(mut self, q: f64) -> Self {
        self.dividend_yield = Some(q);
        self
    }

    /// Time to expiry in years.
    pub fn expiry(mut self, expiry: f64) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn side(mut self, side: OptionType) -> Self {
        self.side = Some(side);
        self
    }

    /// Smile model to calibrate. Default is [`ModelKind::Svi`].
    pub fn model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }

    pub fn add_quote(mut self, strike: f64, bid: f64, ask: f64) -> Self {
        self.quotes.push(Quote::new(strike, bid, ask));
        self
    }

    pub fn quotes(mut self, quotes: &[Quote]) -> Self {
        self.quotes.extend_from_slice(quotes);
        self
    }

    /// Drop quotes with a zero bid before inversion. Default is true.
    pub fn skip_zero_bid(mut self, skip: bool) -> Self {
        self.skip_zero_bid = skip;
        self
    }

    pub fn implied_config(mut self, config: ImpliedVolConfig) -> Self {
        self.implied_config = config;
        self
    }

    pub fn calibration_config(mut self, config: CalibrationConfig) -> Self {
        self.calibration_config = config;
        self
    }

    fn is_usable(&self, quote: &Quote) -> bool {
        let price_ok = |p: f64| p.is_finite() && p >= 0.0;
        quote.strike.is_finite()
            && quote.strike > 0.0
            && price_ok(quote.bid)
            && price_ok(quote.ask)
            && !(self.skip_zero_bid && quote.bid == 0.0)
    }

    /// Filter, invert and calibrate.
    ///
    /// # Errors
    /// Returns [`VolSmileError::InvalidInput`] if a required field is missing
    /// or a market parameter is out of range, [`VolSmileError::NumericalError`]
    /// if no quote survives filtering, and [`VolSmileError::CalibrationError`]
    /// if the fitted objective is not finite.
    pub fn build(self) -> crate::error::Result<FittedSmile> {
        #[cfg(feature = "logging")]
        tracing::debug!(
            n_quotes = self.quotes.len(),
            model = %self.model,
            "smile build started"
        );

        let spot = self.spot.ok_or_else(|| VolSmileError::InvalidInput {
            message: "spot price is required".into(),
        })?;
        let rate = self.rate.ok_or_else(|| VolSmileError::InvalidInput {
            message: "risk-free rate is required".into(),
        })?;
        let expiry = self.expiry.ok_or_else(|| VolSmileError::InvalidInput {
            message: "expiry is required".into(),
        })?;
        let side = self.side.ok_or_else(|| VolSmileError::InvalidInput {
            message: "option side is required".into(),
        })?;
        let q = self.dividend_yield.unwrap_or(0.0);

        validate_positive(spot, "spot")?;
        validate_finite(rate, "rate")?;
        validate_finite(q, "dividend_yield")?;
        validate_positive(expiry, "expiry")?;

        let market = MarketParams {
            spot,
            rate,
            dividend_yield: q,
            time_to_expiry: expiry,
            side,
        };

        let mut quotes: Vec<Quote> = self
            .quotes
            .iter()
            .copied()
            .filter(|quote| self.is_usable(quote))
            .collect();

        #[cfg(feature = "logging")]
        if quotes.len() < self.quotes.len() {
            tracing::warn!(
                dropped = self.quotes.len() - quotes.len(),
                kept = quotes.len(),
                skip_zero_bid = self.skip_zero_bid,
                "filtered unusable quotes"
            );
        }

        if quotes.is_empty() {
            return Err(VolSmileError::NumericalError {
                message: format!(
                    "no usable quotes out of {} after filtering",
                    self.quotes.len()
                ),
            });
        }
        quotes.sort_by(|a, b| a.strike.total_cmp(&b.strike));

        let config = &self.implied_config;
        #[cfg(feature = "parallel")]
        let points: Vec<QuoteVols> = quotes
            .par_iter()
            .map(|quote| quote_vols(quote, &market, config))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let points: Vec<QuoteVols> = quotes
            .iter()
            .map(|quote| quote_vols(quote, &market, config))
            .collect();

        let strikes: Vec<f64> = points.iter().map(|p| p.strike).collect();
        let normalization = StrikeNormalization::fit(&strikes)?;
        let data = SmileData::new(
            strikes
                .iter()
                .map(|&k| normalization.log_moneyness(k))
                .collect(),
            points.iter().map(|p| p.mid.0).collect(),
            points.iter().map(|p| p.bid.0).collect(),
            points.iter().map(|p| p.ask.0).collect(),
        )?;

        let calibration = SmileCalibrator::new(self.calibration_config).fit(&data, self.model)?;
        if !calibration.objective.is_finite() {
            return Err(VolSmileError::CalibrationError {
                message: format!("objective is not finite ({})", calibration.objective),
                model: self.model.name(),
                rms_error: calibration
                    .rms_error
                    .is_finite()
                    .then_some(calibration.rms_error),
            });
        }

        #[cfg(feature = "logging")]
        tracing::debug!(
            n_points = points.len(),
            model = %self.model,
            rms_error = calibration.rms_error,
            "smile build complete"
        );

        Ok(FittedSmile::new(normalization, calibration, points))
    }
}

impl Default for SmileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
