//! High-level entry point for minimizing a user-provided `LeastSquares`
//! model inside a box.
//!
//! This validates the starting point, maps it into the unconstrained space of
//! the box, selects an L-BFGS solver with either Hager–Zhang or More–Thuente
//! line search, and delegates the run to `run_lbfgs`.
use crate::optimization::{
    errors::{OptError, OptResult},
    lsq_optimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LeastSquares, LineSearcher, LsqOptions, LsqOutcome},
        types::Theta,
        validation::validate_residuals,
    },
    numerical_stability::BoxBounds,
};

/// Minimize the mean squared residual `(1/N) Σ r_i(θ)²` subject to
/// `lower ≤ θ ≤ upper`.
///
/// # Behavior
/// - Checks that `theta0` lies inside `bounds` and passes `f.check`.
/// - Evaluates the residuals once at `theta0` to fix the observation count
///   `N` every later evaluation must reproduce.
/// - Moves components of `theta0` that sit on a bound slightly inside (see
///   [`BoxBounds::strictly_interior`]); the logistic map is flat at the
///   bounds and such components would never move.
/// - Maps `theta0` into optimizer space and runs L-BFGS with the line search
///   named in `opts.line_searcher`.
///
/// # Errors
/// - [`OptError::InfeasibleStart`] / [`OptError::ThetaLengthMismatch`] when
///   `theta0` does not fit the box.
/// - [`OptError::EmptyResiduals`] when the model has no observations.
/// - Propagates any error from `f.check`, `f.residuals`, solver construction
///   or the solver run itself.
///
/// # Returns
/// An [`LsqOutcome`] whose `theta_hat` lies inside the box. A run that hits
/// the iteration cap is returned with `converged == false`; deciding whether
/// that is fatal is left to the caller.
///
/// # Example
/// ```no_run
/// use coating_fit::optimization::errors::OptResult;
/// use coating_fit::optimization::lsq_optimizer::{LeastSquares, LsqOptions, Theta, minimize};
/// use coating_fit::optimization::numerical_stability::BoxBounds;
/// use ndarray::{Array1, array};
///
/// struct Shift;
/// impl LeastSquares for Shift {
///     type Data = Array1<f64>;
///     fn residuals(&self, theta: &Theta, y: &Array1<f64>) -> OptResult<Array1<f64>> {
///         Ok(y.mapv(|v| theta[0] - v))
///     }
///     fn check(&self, _: &Theta, _: &Array1<f64>) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let bounds = BoxBounds::new(array![-10.0], array![10.0])?;
/// let y = array![1.0, 2.0, 3.0];
/// let out = minimize(&Shift, bounds.midpoint(), &y, &bounds, &LsqOptions::default())?;
/// println!("θ̂ = {}", out.theta_hat);
/// # Ok::<(), coating_fit::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: LeastSquares>(
    f: &F, theta0: Theta, data: &F::Data, bounds: &BoxBounds, opts: &LsqOptions,
) -> OptResult<LsqOutcome> {
    bounds.check_feasible(&theta0)?;
    f.check(&theta0, data)?;
    let residuals0 = f.residuals(&theta0, data)?;
    let n_obs = residuals0.len();
    if n_obs == 0 {
        return Err(OptError::EmptyResiduals);
    }
    validate_residuals(&residuals0, n_obs)?;

    let z0 = bounds.to_unconstrained(&bounds.strictly_interior(&theta0));
    let problem = ArgMinAdapter::new(f, data, bounds, n_obs);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(z0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(z0, opts, problem, solver)
        }
    }
}
