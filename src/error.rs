//! Error types for the volsmile library.
//!
//! All fallible operations return `Result<T, VolSmileError>` rather than panicking.
//! Optimizer non-convergence is deliberately *not* an error: it is reported
//! through [`OptimizeStatus`](crate::optim::OptimizeStatus) alongside the
//! best-effort point.

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, VolSmileError>;

/// Errors that can occur during implied vol extraction and smile calibration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VolSmileError {
    /// Option side text is neither a call nor a put.
    #[error("invalid option side: {value:?} (expected call or put)")]
    InvalidOptionSide { value: String },

    /// Input data is invalid (e.g., zero expiry, mismatched array lengths).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Numerical computation failed (e.g., no finite implied vol could be recovered).
    #[error("numerical error: {message}")]
    NumericalError { message: String },

    /// Smile calibration produced an unusable fit.
    #[error("calibration failed: {message}")]
    CalibrationError {
        message: String,
        /// Model that failed (e.g., "RFV", "SVI").
        model: &'static str,
        /// Final RMS error, if available.
        rms_error: Option<f64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibration_error_fields_accessible() {
        let err = VolSmileError::CalibrationError {
            message: "objective is not finite".into(),
            model: "RFV",
            rms_error: Some(0.05),
        };
        match &err {
            VolSmileError::CalibrationError {
                message,
                model,
                rms_error,
            } => {
                assert_eq!(message, "objective is not finite");
                assert_eq!(*model, "RFV");
                assert_eq!(*rms_error, Some(0.05));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn invalid_option_side_display_names_value() {
        let err = VolSmileError::InvalidOptionSide {
            value: "straddle".into(),
        };
        let display = format!("{err}");
        assert!(display.contains("straddle"));
        assert!(display.contains("call or put"));
    }

    #[test]
    fn error_display_includes_message() {
        let err = VolSmileError::InvalidInput {
            message: "bad input".into(),
        };
        assert!(format!("{err}").contains("bad input"));

        let err = VolSmileError::NumericalError {
            message: "NaN detected".into(),
        };
        assert!(format!("{err}").contains("NaN detected"));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VolSmileError>();
    }
}
