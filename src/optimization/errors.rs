//! Error surface for the bounded least-squares optimizer.
//!
//! Every failure inside `optimization` is normalized into [`OptError`]:
//! configuration mistakes (tolerances, bounds, line search names), numerical
//! problems (non-finite residuals, Jacobians, or costs), and backend errors
//! raised by `argmin`. Callers never see raw `argmin::core::Error` values.
use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Residuals / Jacobian ----
    /// Implies that FD should be used
    JacobianNotImplemented,

    /// The residual model produced no residuals at the starting point.
    EmptyResiduals,

    /// Residual vector length does not match the number of observations.
    ResidualLengthMismatch {
        expected: usize,
        found: usize,
    },

    /// Residuals need to be finite.
    NonFiniteResidual {
        index: usize,
        value: f64,
    },

    /// Jacobian dimensions do not match `(observations, parameters)`.
    JacobianDimMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Jacobian entries need to be finite.
    InvalidJacobian {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Gradient ----
    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- LsqOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    // ---- Bounds ----
    /// Lower and upper bound vectors differ in length.
    BoundsLengthMismatch {
        lower: usize,
        upper: usize,
    },

    /// Each bound pair must be finite with `lower < upper`.
    InvalidBounds {
        index: usize,
        lower: f64,
        upper: f64,
    },

    /// Starting point lies outside the box.
    InfeasibleStart {
        index: usize,
        value: f64,
        lower: f64,
        upper: f64,
    },

    /// Parameter vector length does not match the box dimension.
    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Argmin ----
    /// argmin itself reported a failure; `kind` names its error class.
    Solver {
        kind: &'static str,
        text: String,
    },

    /// Any other error boxed by argmin.
    BackendError {
        text: String,
    },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Residuals / Jacobian ----
            OptError::JacobianNotImplemented => {
                write!(f, "Analytic Jacobian not implemented")
            }
            OptError::EmptyResiduals => {
                write!(f, "Residual model produced no residuals")
            }
            OptError::ResidualLengthMismatch { expected, found } => {
                write!(f, "Residual length mismatch: expected {expected}, found {found}")
            }
            OptError::NonFiniteResidual { index, value } => {
                write!(f, "Non-finite residual at index {index}: {value}")
            }
            OptError::JacobianDimMismatch { expected, found } => {
                write!(f, "Jacobian dimension mismatch: expected {expected:?}, found {found:?}")
            }
            OptError::InvalidJacobian { row, col, value } => {
                write!(f, "Invalid Jacobian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Gradient ----
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- LsqOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Bounds ----
            OptError::BoundsLengthMismatch { lower, upper } => {
                write!(f, "Bounds length mismatch: {lower} lower bounds, {upper} upper bounds")
            }
            OptError::InvalidBounds { index, lower, upper } => {
                write!(
                    f,
                    "Invalid bounds at index {index}: [{lower}, {upper}], must be finite with lower < upper"
                )
            }
            OptError::InfeasibleStart { index, value, lower, upper } => {
                write!(
                    f,
                    "Starting point at index {index} is {value}, outside the box [{lower}, {upper}]"
                )
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::Solver { kind, text } => {
                write!(f, "Solver error ({kind}): {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own cost/gradient code travel through argmin
        // boxed; recover them first so callers see the original variant.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(argmin_err) => {
                let kind = match &argmin_err {
                    ArgminError::InvalidParameter { .. } => "invalid parameter",
                    ArgminError::NotImplemented { .. } => "not implemented",
                    ArgminError::NotInitialized { .. } => "not initialized",
                    ArgminError::ConditionViolated { .. } => "condition violated",
                    ArgminError::CheckpointNotFound { .. } => "checkpoint not found",
                    ArgminError::PotentialBug { .. } => "potential bug",
                    ArgminError::ImpossibleError { .. } => "impossible error",
                    _ => "unclassified",
                };
                OptError::Solver { kind, text: argmin_err.to_string() }
            }
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Conversion of argmin errors (both argmin's own variants and our
    //   errors boxed inside argmin) back into `OptError`.
    // - Display strings for a few representative variants.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // An `OptError` raised inside a cost function and boxed by argmin must
    // come back out unchanged.
    //
    // Given
    // -----
    // - `OptError::NonFiniteResidual` converted into an `argmin::core::Error`.
    //
    // Expect
    // ------
    // - `OptError::from` returns the original variant.
    fn from_argmin_error_recovers_boxed_opt_error() {
        // Arrange
        let original = OptError::NonFiniteResidual { index: 3, value: f64::INFINITY };
        let boxed: Error = original.clone().into();

        // Act
        let recovered = OptError::from(boxed);

        // Assert
        assert_eq!(recovered, original);
    }

    #[test]
    // Purpose
    // -------
    // argmin's own errors are tagged with their class and keep their text.
    //
    // Given
    // -----
    // - `ArgminError::InvalidParameter` boxed as `argmin::core::Error`.
    //
    // Expect
    // ------
    // - `OptError::Solver` of kind `"invalid parameter"` mentioning the text.
    fn from_argmin_error_maps_invalid_parameter() {
        // Arrange
        let boxed: Error = ArgminError::InvalidParameter { text: "tol".to_string() }.into();

        // Act
        let mapped = OptError::from(boxed);

        // Assert
        match mapped {
            OptError::Solver { kind, text } => {
                assert_eq!(kind, "invalid parameter");
                assert!(text.contains("tol"));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Bound and start-point errors render the offending values.
    fn display_mentions_offending_bounds() {
        let err = OptError::InfeasibleStart { index: 1, value: 2.0, lower: 0.0, upper: 1.0 };
        let text = err.to_string();
        assert!(text.contains("index 1"));
        assert!(text.contains("[0, 1]"));
    }
}
