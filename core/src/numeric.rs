//! Shared arithmetic and input validation for the decision primitives.
//!
//! Every primitive accepts a trust weight in `[0, 1]` that interpolates
//! between a classical prediction-free policy (trust = 0) and a fully
//! prediction-driven policy (trust = 1). The blend lives here so the
//! interpolation is identical across primitives.

use crate::error::DecisionError;

/// Linear interpolation between a predicted target and a classical fallback.
///
/// At `trust = 1` the result is the prediction; at `trust = 0` it is the
/// fallback. The result moves continuously in `trust`, which is what gives
/// the threshold primitives their smoothness.
pub fn trust_blend(trust: f64, predicted: f64, fallback: f64) -> f64 {
    trust * predicted + (1.0 - trust) * fallback
}

/// Validate a trust weight: finite and within `[0, 1]`.
pub fn ensure_trust(trust: f64) -> Result<f64, DecisionError> {
    ensure_finite("trust", trust)?;

    if !(0.0..=1.0).contains(&trust) {
        return Err(DecisionError::InvalidArgument(format!(
            "trust must be within [0, 1], got {trust}"
        )));
    }

    Ok(trust)
}

/// Reject NaN and infinities up front so threshold comparisons stay total.
pub fn ensure_finite(field: &str, value: f64) -> Result<f64, DecisionError> {
    if !value.is_finite() {
        return Err(DecisionError::InvalidArgument(format!(
            "{field} must be finite, got {value}"
        )));
    }

    Ok(value)
}

/// Validate a finite value with `value >= 0`.
pub fn ensure_non_negative(field: &str, value: f64) -> Result<f64, DecisionError> {
    ensure_finite(field, value)?;

    if value < 0.0 {
        return Err(DecisionError::InvalidArgument(format!(
            "{field} must be non-negative, got {value}"
        )));
    }

    Ok(value)
}

/// Validate a finite value with `value > 0`.
pub fn ensure_positive(field: &str, value: f64) -> Result<f64, DecisionError> {
    ensure_finite(field, value)?;

    if value <= 0.0 {
        return Err(DecisionError::InvalidArgument(format!(
            "{field} must be positive, got {value}"
        )));
    }

    Ok(value)
}
