//! Weighted least-squares smile calibration.
//!
//! Fits one [`ModelKind`] to mid implied vols at a set of log-moneyness
//! points. Each point is weighted by the inverse of its bid/ask vol spread:
//!
//! ```text
//! f(θ) = Σᵢ wᵢ·(σ(kᵢ; θ) − midᵢ)²,   wᵢ = 1/(askᵢ − bidᵢ + ε)
//! ```
//!
//! The gradient is taken by forward differences and the objective is handed
//! to the bounded L-BFGS-B solver in [`crate::optim`]. Whatever point the
//! solver ends on is returned, converged or not; the status travels with it
//! in [`Calibration`].
//!
//! Crossed quotes (`ask < bid`) are not rejected. They produce a small or
//! negative weight, so keep such data out of the input.

pub(crate) mod objective;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::VolSmileError;
use crate::optim::{self, Bound, LbfgsbConfig, OptimizeStatus};
use crate::smile::{ModelKind, N_PARAMS, Params};
use crate::validate::{validate_all_finite, validate_positive, validate_same_len};

use objective::{WeightedObjective, rms_error, to_params};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Starting point used for every model unless overridden.
pub const DEFAULT_INITIAL_GUESS: Params = [0.2, 0.3, 0.1, 0.2, 0.1];

/// Calibration settings.
///
/// ```
/// use volsmile::calibration::CalibrationConfig;
/// use volsmile::smile::ModelKind;
///
/// let config = CalibrationConfig::default()
///     .with_bounds(ModelKind::Svi.natural_bounds())
///     .with_initial_guess([0.2, 0.1, -0.3, 0.0, 0.1]);
/// assert!(config.bounds.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Starting parameter vector (default `[0.2, 0.3, 0.1, 0.2, 0.1]`).
    pub initial_guess: Params,
    /// Added to each bid/ask spread before inverting it into a weight (default 1e-8).
    pub weight_epsilon: f64,
    /// Forward-difference bump per parameter (default 1e-8).
    pub fd_epsilon: f64,
    /// Parameter box. `None` leaves every parameter free. Infinite ends are
    /// written to JSON as `null`.
    #[serde(with = "crate::optim::serde_bounds", default)]
    pub bounds: Option<[Bound; N_PARAMS]>,
    /// Score a parameter vector as `+∞` when the model is non-finite at any
    /// data point (default true). This is what keeps RFV off its poles.
    pub reject_non_finite: bool,
    /// Solver settings.
    pub optimizer: LbfgsbConfig,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            initial_guess: DEFAULT_INITIAL_GUESS,
            weight_epsilon: 1e-8,
            fd_epsilon: 1e-8,
            bounds: None,
            reject_non_finite: true,
            optimizer: LbfgsbConfig::default(),
        }
    }
}

impl CalibrationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: Params) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: [Bound; N_PARAMS]) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn with_weight_epsilon(mut self, weight_epsilon: f64) -> Self {
        self.weight_epsilon = weight_epsilon;
        self
    }

    #[must_use]
    pub fn with_fd_epsilon(mut self, fd_epsilon: f64) -> Self {
        self.fd_epsilon = fd_epsilon;
        self
    }

    #[must_use]
    pub fn with_reject_non_finite(mut self, reject_non_finite: bool) -> Self {
        self.reject_non_finite = reject_non_finite;
        self
    }

    #[must_use]
    pub fn with_optimizer(mut self, optimizer: LbfgsbConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    fn validate(&self) -> crate::error::Result<()> {
        validate_all_finite(&self.initial_guess, "initial_guess")?;
        validate_positive(self.weight_epsilon, "weight_epsilon")?;
        validate_positive(self.fd_epsilon, "fd_epsilon")?;
        Ok(())
    }
}

/// One smile's worth of calibration input, in log-moneyness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmileData {
    pub k: Vec<f64>,
    pub mid: Vec<f64>,
    pub bid: Vec<f64>,
    pub ask: Vec<f64>,
}

impl SmileData {
    /// # Errors
    /// Returns [`VolSmileError::InvalidInput`] if the four vectors differ in
    /// length, are empty, or hold a non-finite value.
    pub fn new(
        k: Vec<f64>,
        mid: Vec<f64>,
        bid: Vec<f64>,
        ask: Vec<f64>,
    ) -> crate::error::Result<Self> {
        let data = Self { k, mid, bid, ask };
        data.validate()?;
        Ok(data)
    }

    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.k.is_empty() {
            return Err(VolSmileError::InvalidInput {
                message: "at least one calibration point is required".into(),
            });
        }
        let n = self.k.len();
        validate_same_len(n, self.mid.len(), "mid")?;
        validate_same_len(n, self.bid.len(), "bid")?;
        validate_same_len(n, self.ask.len(), "ask")?;
        validate_all_finite(&self.k, "k")?;
        validate_all_finite(&self.mid, "mid")?;
        validate_all_finite(&self.bid, "bid")?;
        validate_all_finite(&self.ask, "ask")?;
        Ok(())
    }
}

/// Outcome of a single calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub kind: ModelKind,
    pub params: Params,
    /// Weighted objective at `params`.
    pub objective: f64,
    /// Unweighted RMS of `σ(kᵢ) − midᵢ`.
    pub rms_error: f64,
    pub nfev: usize,
    pub nit: usize,
    pub status: OptimizeStatus,
    pub message: String,
}

impl Calibration {
    pub fn success(&self) -> bool {
        self.status.is_success()
    }
}

/// Reusable calibration driver.
///
/// ```
/// use volsmile::calibration::{SmileCalibrator, SmileData};
/// use volsmile::smile::ModelKind;
///
/// let data = SmileData::new(
///     vec![-0.1, 0.0, 0.1],
///     vec![0.22, 0.20, 0.23],
///     vec![0.21, 0.19, 0.22],
///     vec![0.23, 0.21, 0.24],
/// )?;
/// let fit = SmileCalibrator::default().fit(&data, ModelKind::Slv)?;
/// assert!(fit.rms_error < 0.01);
/// # Ok::<(), volsmile::VolSmileError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SmileCalibrator {
    config: CalibrationConfig,
}

impl SmileCalibrator {
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Fit `kind` to `data`.
    ///
    /// # Errors
    /// Returns [`VolSmileError::InvalidInput`] for malformed data, config or
    /// bounds. Solver non-convergence is not an error; check
    /// [`Calibration::status`].
    pub fn fit(&self, data: &SmileData, kind: ModelKind) -> crate::error::Result<Calibration> {
        data.validate()?;
        self.config.validate()?;

        #[cfg(feature = "logging")]
        tracing::debug!(model = %kind, n_points = data.len(), "calibration started");

        let objective = WeightedObjective::new(
            kind,
            data,
            self.config.weight_epsilon,
            self.config.reject_non_finite,
        );
        let fd_epsilon = self.config.fd_epsilon;
        let bounds = self
            .config
            .bounds
            .map_or_else(|| optim::unbounded(N_PARAMS), |b| b.to_vec());

        let result = optim::minimize(
            |x: &DVector<f64>, grad: &mut DVector<f64>| {
                objective.value_and_gradient(x, grad, fd_epsilon)
            },
            &self.config.initial_guess,
            &bounds,
            &self.config.optimizer,
        )?;

        let params = to_params(&DVector::from_column_slice(&result.x));

        #[cfg(feature = "logging")]
        if !result.success() {
            tracing::warn!(
                model = %kind,
                status = result.status.code(),
                message = %result.message,
                nit = result.nit,
                "smile calibration did not converge"
            );
        }

        let calibration = Calibration {
            kind,
            params,
            objective: result.fun,
            rms_error: rms_error(kind, data, &params),
            nfev: result.nfev,
            nit: result.nit,
            status: result.status,
            message: result.message,
        };

        #[cfg(feature = "logging")]
        tracing::debug!(
            model = %kind,
            objective = calibration.objective,
            rms_error = calibration.rms_error,
            nfev = calibration.nfev,
            "calibration complete"
        );

        Ok(calibration)
    }

    /// Fit several independent smiles, in parallel with the `parallel` feature.
    ///
    /// Results keep the input order; one bad slice does not stop the others.
    pub fn fit_many(
        &self,
        slices: &[(SmileData, ModelKind)],
    ) -> Vec<crate::error::Result<Calibration>> {
        #[cfg(feature = "parallel")]
        let results: Vec<_> = slices
            .par_iter()
            .map(|(data, kind)| self.fit(data, *kind))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = slices
            .iter()
            .map(|(data, kind)| self.fit(data, *kind))
            .collect();
        results
    }

    /// Fit every [`ModelKind`] to the same data, best objective first.
    ///
    /// # Errors
    /// Propagates the first error from [`fit`](Self::fit). With valid data
    /// all four fits either succeed or fail together.
    pub fn fit_all_kinds(&self, data: &SmileData) -> crate::error::Result<Vec<Calibration>> {
        #[cfg(feature = "parallel")]
        let mut fits = ModelKind::ALL
            .par_iter()
            .map(|&kind| self.fit(data, kind))
            .collect::<crate::error::Result<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let mut fits = ModelKind::ALL
            .iter()
            .map(|&kind| self.fit(data, kind))
            .collect::<crate::error::Result<Vec<_>>>()?;

        // NaN objectives sort last.
        fits.sort_by(|a, b| {
            a.objective
                .is_nan()
                .cmp(&b.objective.is_nan())
                .then(a.objective.total_cmp(&b.objective))
        });
        Ok(fits)
    }
}

/// Fit `kind` with default settings and return the parameter vector.
///
/// `k` is log-moneyness; `mid`, `bid` and `ask` are implied vols at each
/// point. The parameters are returned even when the solver stops without
/// converging; a warning is logged in that case.
///
/// # Errors
/// Returns [`VolSmileError::InvalidInput`] if the slices differ in length,
/// are empty, or contain non-finite values.
pub fn calibrate(
    k: &[f64],
    mid: &[f64],
    bid: &[f64],
    ask: &[f64],
    kind: ModelKind,
) -> crate::error::Result<Params> {
    let data = SmileData::new(k.to_vec(), mid.to_vec(), bid.to_vec(), ask.to_vec())?;
    Ok(SmileCalibrator::default().fit(&data, kind)?.params)
}
