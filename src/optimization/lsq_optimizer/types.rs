//! lsq_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the bounded
//! least-squares optimizer, so the rest of the optimization code stays
//! agnostic to `ndarray` and Argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta` is used both for model-space parameters and for the
//!   unconstrained optimizer vector `z`; which one is meant is always stated
//!   at the call site.
//! - `Jacobian` is the residual Jacobian `∂r_i/∂θ_k`, shape
//!   `observations × parameters`.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ` (model space) or `z` (optimizer space).
pub type Theta = Array1<f64>;

/// Gradient of the scalar cost, same shape as `Theta`.
pub type Grad = Array1<f64>;

/// Residual vector, one entry per observation.
pub type Residuals = Array1<f64>;

/// Residual Jacobian, `observations × parameters`.
pub type Jacobian = Array2<f64>;

/// Scalar objective value: the mean of squared residuals.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager–Zhang line search specialized to this crate’s numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
