//! optimization — bounded least squares, numerical helpers, and unified
//! error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for curve fitting, combining an
//! Argmin-backed box-constrained least-squares optimizer, numerically stable
//! box transforms, and a single error/result surface. Callers implement a
//! residual model, choose bounds and tolerances, and obtain fitted
//! parameters and diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing mean squared residuals**
//!   inside a box (`lsq_optimizer`), including configuration of solvers and
//!   stopping criteria.
//! - Supply shared numerical primitives (`numerical_stability`) for mapping
//!   unconstrained optimizer coordinates into the box and back.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers iterate in an unconstrained space `z`; every residual
//!   evaluation happens at a model-space `θ` strictly inside the box.
//! - Inputs are assumed finite once validation has passed; invalid states
//!   are reported as `OptError`, not panics.
//!
//! Conventions
//! -----------
//! - Parameters, gradients, residuals and Jacobians are `ndarray`-based
//!   aliases (`Theta`, `Grad`, `Residuals`, `Jacobian`).
//! - Public optimization entrypoints that can fail return `OptResult<T>`;
//!   callers never see raw Argmin errors.
//! - Logging is limited to `debug!` traces behind `LsqOptions::verbose`;
//!   higher layers report progress and results.
//!
//! Testing notes
//! -------------
//! - `lsq_optimizer`: solver wiring, tolerance handling, and toy fits with
//!   interior and bound-active optima.
//! - `numerical_stability`: logistic/logit tails and round trips through the
//!   box transform.
//! - `errors`: conversions from backend errors into `OptError`.

pub mod errors;
pub mod lsq_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use coating_fit::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::lsq_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
