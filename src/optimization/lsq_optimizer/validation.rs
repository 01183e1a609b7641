//! Shape and finiteness checks shared by the solver entry point and the
//! argmin adapter.
//!
//! Options are checked once at construction ([`verify_tol_grad`],
//! [`verify_tol_cost`]); residuals, Jacobians and gradients are checked on
//! every evaluation; the solver's final iterate is checked by
//! [`validate_theta_hat`] and [`validate_value`]. Each failure maps to the
//! [`OptError`] variant naming the first offending entry.
use crate::optimization::{
    errors::{OptError, OptResult},
    lsq_optimizer::types::{Grad, Jacobian, Residuals, Theta},
};

/// Validate the optional gradient‐norm tolerance.
///
/// - Accepts `None` (no stopping rule on gradient).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance (for convergence).
///
/// - Accepts `None` (no stopping rule on cost change).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a residual vector against the expected observation count.
///
/// # Errors
/// - [`OptError::ResidualLengthMismatch`] if the length is wrong.
/// - [`OptError::NonFiniteResidual`] for the first `NaN`/`±∞` entry.
pub fn validate_residuals(residuals: &Residuals, n_obs: usize) -> OptResult<()> {
    if residuals.len() != n_obs {
        return Err(OptError::ResidualLengthMismatch { expected: n_obs, found: residuals.len() });
    }
    for (index, &value) in residuals.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::NonFiniteResidual { index, value });
        }
    }
    Ok(())
}

/// Validate a residual Jacobian's shape and entries.
///
/// # Errors
/// - [`OptError::JacobianDimMismatch`] if the shape is not `n_obs × dim`.
/// - [`OptError::InvalidJacobian`] for the first non-finite entry.
pub fn validate_jacobian(jacobian: &Jacobian, n_obs: usize, dim: usize) -> OptResult<()> {
    if jacobian.nrows() != n_obs || jacobian.ncols() != dim {
        return Err(OptError::JacobianDimMismatch {
            expected: (n_obs, dim),
            found: (jacobian.nrows(), jacobian.ncols()),
        });
    }
    for ((row, col), &value) in jacobian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidJacobian { row, col, value });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar cost is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
