//! inference — uncertainty of fitted parameters.
//!
//! Purpose
//! -------
//! Provide post-estimation uncertainty quantification for least-squares
//! fits: the classical covariance `s² (JᵀJ)⁺` and the standard errors
//! derived from it, evaluated at the fitted point in **model space**.
//!
//! Key behaviors
//! -------------
//! - [`least_squares_covariance`] validates its inputs, returns `None` when
//!   there are no residual degrees of freedom, and inverts the Gram matrix
//!   through a truncated symmetric eigendecomposition.
//! - Failures surface as [`InferenceError`]; nothing here panics or logs.
//!
//! Conventions
//! -----------
//! - Jacobian rows are observations and columns are parameters.
//! - Parameters at an active bound are treated like interior ones; the
//!   estimate is a local linearization, not a constrained interval.

pub mod covariance;
pub mod errors;

pub use self::covariance::{ParamCovariance, least_squares_covariance};
pub use self::errors::{InferenceError, InferenceResult};
