//! Unified error handling for inference routines.
//!
//! This module defines `InferenceError`, the error type used by the
//! post-fit covariance estimate. An alias `InferenceResult<T>` standardizes
//! the return type across inference code.

/// Unified error type for inference routines.
///
/// Covers shape mismatches between the Jacobian and the residuals and
/// non-finite inputs that would poison the eigendecomposition.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Inputs ----
    /// Jacobian rows and residual length disagree.
    ShapeMismatch { rows: usize, residuals: usize },

    /// Jacobian or residuals contain NaN/±inf.
    NonFiniteInput { what: &'static str },

    // ---- Numerical ----
    /// Every eigenvalue of `JᵀJ` was truncated; no direction is identified.
    Unidentified,
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Inputs ----
            InferenceError::ShapeMismatch { rows, residuals } => write!(
                f,
                "Inference Error: Jacobian has {rows} rows but {residuals} residuals were given"
            ),
            InferenceError::NonFiniteInput { what } => {
                write!(f, "Inference Error: {what} contains non-finite values")
            }
            // ---- Numerical ----
            InferenceError::Unidentified => {
                write!(f, "Inference Error: JᵀJ has no eigenvalue above the truncation threshold")
            }
        }
    }
}

impl std::error::Error for InferenceError {}
