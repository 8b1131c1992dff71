//! Input validation helpers.
//!
//! Uses `!is_finite()` to reject NaN, +Inf and -Inf uniformly.

use crate::error::VolSmileError;

/// Validate that a value is strictly positive and finite.
pub(crate) fn validate_positive(value: f64, name: &str) -> crate::error::Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(VolSmileError::InvalidInput {
            message: format!("{name} must be positive and finite, got {value}"),
        });
    }
    Ok(value)
}

/// Validate that a value is finite (allows zero and negatives).
pub(crate) fn validate_finite(value: f64, name: &str) -> crate::error::Result<f64> {
    if !value.is_finite() {
        return Err(VolSmileError::InvalidInput {
            message: format!("{name} must be finite, got {value}"),
        });
    }
    Ok(value)
}

/// Validate that every element of a slice is finite.
pub(crate) fn validate_all_finite(values: &[f64], name: &str) -> crate::error::Result<()> {
    if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(VolSmileError::InvalidInput {
            message: format!("{name}[{i}] must be finite, got {v}"),
        });
    }
    Ok(())
}

/// Validate that a slice has the expected length.
pub(crate) fn validate_same_len(
    expected: usize,
    actual: usize,
    name: &str,
) -> crate::error::Result<()> {
    if expected != actual {
        return Err(VolSmileError::InvalidInput {
            message: format!("{name} has length {actual}, expected {expected}"),
        });
    }
    Ok(())
}
