//! lsq_optimizer — argmin-powered, box-constrained least-squares optimizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **minimizing
//! the mean squared residual** of a model subject to simple box bounds.
//! Callers implement a single trait, [`LeastSquares`], and invoke
//! [`minimize`] to run L-BFGS with a configurable line search, tolerances
//! and a finite-difference fallback.
//!
//! Key behaviors
//! -------------
//! - Convert user residual models into Argmin cost functions via
//!   [`adapter::ArgMinAdapter`], which evaluates `c(θ) = (1/N) Σ r_i(θ)²`.
//! - Enforce the box by reparameterization: the solver iterates on an
//!   unconstrained `z` and every evaluation happens at
//!   `θ = lower + (upper − lower)·σ(z)`
//!   (see [`crate::optimization::numerical_stability::BoxBounds`]).
//! - Expose a single entrypoint [`minimize`] that:
//!   - checks the start against the box and [`LeastSquares::check`],
//!   - selects an L-BFGS solver via [`builders`] based on [`LineSearcher`],
//!   - executes the solver via [`run::run_lbfgs`], and
//!   - normalizes results into an [`LsqOutcome`] in model space.
//!
//! Invariants & assumptions
//! ------------------------
//! - `LsqOutcome::theta_hat` always lies inside the box.
//! - The residual length `N` is fixed by the first evaluation; any later
//!   evaluation producing a different length is an error.
//! - Residuals, Jacobians and gradients are validated as finite before they
//!   reach the solver.
//!
//! Conventions
//! -----------
//! - [`LeastSquares::jacobian`] is the Jacobian of the residuals with respect
//!   to **model-space** `θ`; the chain rule into `z` is applied internally.
//! - Hitting `max_iter` yields `converged == false`, not an error.
//! - Errors bubble up as [`OptResult<T>`](crate::optimization::errors::OptResult);
//!   this module never intentionally panics.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover gradient agreement in [`adapter`], solver
//!   construction in [`builders`], input checks in [`validation`],
//!   configuration and outcome classification in [`traits`], and end-to-end
//!   fits (interior and bound-active) in [`api`].

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{LeastSquares, LineSearcher, LsqOptions, LsqOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Jacobian, Residuals, Theta};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{LeastSquares, LineSearcher, LsqOptions, LsqOutcome, Tolerances};
    pub use super::types::{Jacobian, Residuals, Theta};
}
