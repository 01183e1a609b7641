//! Execution helper that runs an `argmin` solver on a bounded least-squares
//! problem and returns a crate-friendly [`LsqOutcome`].
use crate::optimization::{
    errors::OptResult,
    lsq_optimizer::{
        adapter::ArgMinAdapter,
        traits::{LeastSquares, LsqOptions, LsqOutcome},
        types::{Grad, Theta},
    },
};
use argmin::core::{CostFunction, Executor, State};
use log::debug;

/// Run an `argmin` optimization for a least-squares problem.
///
/// This is the shared runner used by both line-search variants. It wires up
/// the adapted problem, the chosen solver, the initial **optimizer-space**
/// vector `z0`, the optional iteration cap and (behind `obs_slog`) a terminal
/// observer, then maps the best `z` back into the box.
///
/// # Errors
/// - Propagates any `argmin` runtime error (solver errors, line-search
///   failures, errors raised by the user's residuals) as `OptError`.
/// - Propagates validation errors raised when building [`LsqOutcome`].
pub fn run_lbfgs<'a, F, S>(
    z0: Theta, opts: &LsqOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<LsqOutcome>
where
    F: LeastSquares,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    let bounds = problem.bounds;
    if opts.verbose {
        let c0 = problem.cost(&z0)?;
        debug!("initial cost {c0:.6e} at theta0 = {}", bounds.to_model(&z0));
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(z0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    let theta_hat = result.take_best_param().map(|z| bounds.to_model(&z));
    LsqOutcome::new(
        theta_hat,
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}
