//! lsq_optimizer::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the L-BFGS solvers used by the
//! least-squares optimizer. These helpers hide Argmin’s generic wiring and
//! apply crate-level options (tolerances, memory size) so higher-level code
//! can request a configured solver without touching Argmin-specific types.
//!
//! Conventions
//! -----------
//! - The builders do **not** set an initial parameter vector or
//!   `max_iters`; these are runtime concerns applied by [`run_lbfgs`]
//!   (crate::optimization::lsq_optimizer::run::run_lbfgs).
//! - Errors are always reported via [`OptResult`]; the underlying
//!   `argmin::core::Error` values never leak across module boundaries.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    lsq_optimizer::{
        traits::LsqOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// Construct L-BFGS with Hager–Zhang line search.
///
/// Consults `opts.lbfgs_mem` (falls back to [`DEFAULT_LBFGS_MEM`]) and the
/// optional gradient/cost tolerances.
///
/// # Errors
/// `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
/// tolerance.
pub fn build_optimizer_hager_zhang(opts: &LsqOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with More–Thuente line search.
///
/// Same option handling as [`build_optimizer_hager_zhang`].
pub fn build_optimizer_more_thuente(opts: &LsqOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional tolerances to an L-BFGS solver, regardless of its line
/// search type. `None` leaves Argmin's default in place.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &LsqOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
