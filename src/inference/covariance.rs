//! Parameter covariance at a least-squares optimum.
//!
//! This module turns the residual Jacobian `J` and residuals `r` at a fitted
//! point into the classical nonlinear least-squares covariance
//!
//! `Cov(θ̂) = s² · (JᵀJ)⁺`, with `s² = Σ r_i² / (N − p)`.
//!
//! The Gram matrix is copied into a `nalgebra::DMatrix` and inverted through
//! a symmetric eigendecomposition, discarding eigenvalues below a relative
//! threshold. Weakly identified directions therefore get large (not
//! infinite) variances, and an exactly collinear design still yields a
//! finite pseudoinverse.
//!
//! Conventions
//! -----------
//! - Rows of `J` are observations, columns are parameters, in the same order
//!   as `θ̂`.
//! - Residual rescaling by a positive constant leaves the result unchanged,
//!   so callers may pass the residuals the optimizer actually used.
//! - With `N ≤ p` there are no residual degrees of freedom and the
//!   covariance is reported as absent (`Ok(None)`).
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::numerical_stability::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Covariance estimate and the quantities derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamCovariance {
    /// `p × p` covariance matrix.
    pub matrix: Array2<f64>,
    /// `sqrt(diag(matrix))`.
    pub std_errors: Array1<f64>,
    /// Residual variance `s²`.
    pub sigma2: f64,
    /// Residual degrees of freedom `N − p`.
    pub dof: usize,
}

/// least_squares_covariance — `s² (JᵀJ)⁺` at a fitted point.
///
/// Parameters
/// ----------
/// - `jacobian`: `&Array2<f64>`
///   `N × p` residual Jacobian at `θ̂`.
/// - `residuals`: `&Array1<f64>`
///   Length-`N` residuals at `θ̂`, on the same scale as `jacobian`.
///
/// Returns
/// -------
/// `InferenceResult<Option<ParamCovariance>>`
///   `Ok(None)` when `N ≤ p`; otherwise the covariance, standard errors and
///   residual variance.
///
/// Errors
/// ------
/// - `InferenceError::ShapeMismatch` if `jacobian.nrows() != residuals.len()`.
/// - `InferenceError::NonFiniteInput` for NaN/±inf entries.
/// - `InferenceError::Unidentified` if `JᵀJ` is numerically zero.
///
/// Notes
/// -----
/// - Eigenvalues `λ_k ≤ EIGEN_EPS · λ_max` are treated as zero. With the
///   eigendecomposition `JᵀJ = Q Λ Qᵀ`, the pseudoinverse is
///   `Σ_{k: λ_k kept} q_k q_kᵀ / λ_k`.
pub fn least_squares_covariance(
    jacobian: &Array2<f64>, residuals: &Array1<f64>,
) -> InferenceResult<Option<ParamCovariance>> {
    let (n, p) = jacobian.dim();
    if n != residuals.len() {
        return Err(InferenceError::ShapeMismatch { rows: n, residuals: residuals.len() });
    }
    if jacobian.iter().any(|v| !v.is_finite()) {
        return Err(InferenceError::NonFiniteInput { what: "Jacobian" });
    }
    if residuals.iter().any(|v| !v.is_finite()) {
        return Err(InferenceError::NonFiniteInput { what: "residuals" });
    }
    if n <= p {
        return Ok(None);
    }

    let dof = n - p;
    let sigma2 = residuals.dot(residuals) / dof as f64;
    let gram = jacobian.t().dot(jacobian);
    let pinv = symmetric_pinv(&gram)?;
    let matrix = pinv * sigma2;
    let std_errors = matrix.diag().mapv(|v| v.max(0.0).sqrt());
    Ok(Some(ParamCovariance { matrix, std_errors, sigma2, dof }))
}

/// Pseudoinverse of a symmetric PSD matrix via eigenvalue truncation.
fn symmetric_pinv(gram: &Array2<f64>) -> InferenceResult<Array2<f64>> {
    let p = gram.nrows();
    let gram_nalg = DMatrix::<f64>::from_fn(p, p, |i, j| gram[[i, j]]);
    let eigen_decomp = gram_nalg.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;
    let lambda_max = eigenvals.iter().cloned().fold(0.0_f64, f64::max);
    if lambda_max <= 0.0 {
        return Err(InferenceError::Unidentified);
    }
    let cutoff = EIGEN_EPS * lambda_max;

    let mut pinv = Array2::<f64>::zeros((p, p));
    for (k, &lambda) in eigenvals.iter().enumerate() {
        if lambda <= cutoff {
            continue;
        }
        for i in 0..p {
            for j in 0..p {
                pinv[[i, j]] += q[(i, k)] * q[(j, k)] / lambda;
            }
        }
    }
    Ok(pinv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement with the closed-form OLS covariance for a full-rank design.
    // - Absence of a covariance without residual degrees of freedom.
    // - Finite output for a rank-deficient design.
    // - Input validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // For a straight-line design the covariance equals `s² (XᵀX)⁻¹`.
    //
    // Given
    // -----
    // - `X = [[1, 0], [1, 1], [1, 2], [1, 3]]`, residuals `[0.1, −0.2, 0.2, −0.1]`.
    //
    // Expect
    // ------
    // - `s² = 0.1 / 2 = 0.05`.
    // - `(XᵀX)⁻¹ = [[0.7, −0.3], [−0.3, 0.2]]`.
    // - The result is symmetric.
    fn matches_closed_form_ols_covariance() {
        // Arrange
        let jac = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let r = array![0.1, -0.2, 0.2, -0.1];

        // Act
        let cov = least_squares_covariance(&jac, &r).expect("valid inputs").expect("dof > 0");

        // Assert
        assert_eq!(cov.dof, 2);
        assert_relative_eq!(cov.sigma2, 0.05, epsilon = 1e-12);
        assert_relative_eq!(cov.matrix[[0, 0]], 0.05 * 0.7, epsilon = 1e-10);
        assert_relative_eq!(cov.matrix[[0, 1]], -0.05 * 0.3, epsilon = 1e-10);
        assert_relative_eq!(cov.matrix[[1, 0]], cov.matrix[[0, 1]], epsilon = 1e-14);
        assert_relative_eq!(cov.std_errors[1], (0.05f64 * 0.2).sqrt(), epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // With `N ≤ p` there is no residual variance estimate.
    fn absent_without_degrees_of_freedom() {
        let jac = array![[1.0, 2.0, 3.0], [0.5, 1.0, 0.0], [2.0, 0.0, 1.0]];
        let r = array![0.1, 0.2, 0.3];

        assert_eq!(least_squares_covariance(&jac, &r), Ok(None));
    }

    #[test]
    // Purpose
    // -------
    // Collinear columns do not produce infinities.
    fn rank_deficient_design_stays_finite() {
        let jac = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]];
        let r = array![0.1, -0.1, 0.05, 0.0];

        let cov = least_squares_covariance(&jac, &r).expect("valid inputs").expect("dof > 0");

        assert!(cov.matrix.iter().all(|v| v.is_finite()));
    }

    #[test]
    // Purpose
    // -------
    // Shape mismatches and non-finite inputs are reported.
    fn validates_inputs() {
        let jac = array![[1.0], [1.0]];
        assert_eq!(
            least_squares_covariance(&jac, &array![0.0]),
            Err(InferenceError::ShapeMismatch { rows: 2, residuals: 1 })
        );
        assert_eq!(
            least_squares_covariance(&jac, &array![0.0, f64::NAN]),
            Err(InferenceError::NonFiniteInput { what: "residuals" })
        );
    }
}
