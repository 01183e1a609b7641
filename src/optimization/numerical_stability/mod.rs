//! numerical_stability — stable transforms and box bounds for the optimizer.
//!
//! Purpose
//! -------
//! Collect the numerically stable scalar transforms and the box-bound mapping
//! that let the least-squares optimizer iterate in an unconstrained space
//! while every candidate it evaluates stays inside the physical-plausibility
//! box of the model.
//!
//! Key behaviors
//! -------------
//! - Provide stable scalar transforms (`safe_logistic`, its derivative, and
//!   `safe_logit`) that never overflow for finite inputs.
//! - Provide [`BoxBounds`], which validates `[lo, hi]` pairs, maps between
//!   optimizer space and model space, and supplies the diagonal chain-rule
//!   factor for gradients.
//! - Centralize small numeric tolerances (`LOGIT_EPS`, `EIGEN_EPS`) so the
//!   optimizer and inference layers share consistent guards.
//!
//! Invariants & assumptions
//! ------------------------
//! - All public transforms assume finite `f64` inputs.
//! - A [`BoxBounds`] value always holds finite pairs with `lo < hi`.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state; it is
//!   pure numerical helpers suitable for use inside tight inner loops.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement with naïve formulas,
//!   tail behavior, and inverse/derivative consistency.
//! - Unit tests in [`bounds`] cover validation, the range guarantee of the
//!   logistic map, round trips, and the chain factor.

pub mod bounds;
pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bounds::BoxBounds;
pub use self::transformations::{
    EIGEN_EPS, LOGIT_EPS, safe_logistic, safe_logistic_deriv, safe_logit,
};

pub mod prelude {
    pub use super::bounds::BoxBounds;
    pub use super::transformations::{EIGEN_EPS, LOGIT_EPS, safe_logistic, safe_logit};
}
