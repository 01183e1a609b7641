//! Fitter: bounded least-squares estimates of `(A, B, C)`.
//!
//! Purpose
//! -------
//! Solve the absolute-error and relative-error problems over the same
//! dataset and package each estimate with the diagnostics the report needs:
//! predictions, ratios `pred/target`, the shared `score`, and (when there
//! are more recipes than parameters) a covariance estimate.
//!
//! Key behaviors
//! -------------
//! - Each objective is solved independently from the same starting point
//!   with the same bounds and solver settings.
//! - A solver that stops on the iteration cap is a
//!   [`CoatingError::ConvergenceFailed`] naming the objective; any other
//!   solver error is a [`CoatingError::Optimizer`] naming the objective.
//!   Neither is retried.
//! - The reported score is recomputed from the returned parameters with
//!   [`score_from_ratios`], not copied from the solver's cost.
use log::info;
use ndarray::Array1;

use crate::{
    coating::{
        errors::{CoatingError, CoatingResult},
        features::FeatureMatrix,
        model::CoatingParams,
        objective::{CoatingLsq, Objective, score_from_ratios},
        options::FitOptions,
    },
    inference::{ParamCovariance, least_squares_covariance},
    optimization::lsq_optimizer::{LeastSquares, minimize},
};

/// One fitted parameter vector and its diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub objective: Objective,
    pub params: CoatingParams,
    /// `log10(mean((ratio − 1)²))` at `params`.
    pub score: f64,
    /// Mean squared residual reported by the solver.
    pub cost: f64,
    pub predictions: Array1<f64>,
    pub ratios: Array1<f64>,
    /// Absent with three or fewer recipes.
    pub covariance: Option<ParamCovariance>,
    pub iterations: usize,
    pub status: String,
}

impl FitResult {
    /// `ratio − 1` per recipe.
    pub fn fractional_residuals(&self) -> Array1<f64> {
        &self.ratios - 1.0
    }
}

/// Both estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct FitPair {
    pub absolute: FitResult,
    pub relative: FitResult,
}

/// Fit a single objective.
///
/// # Errors
/// - [`CoatingError::InvalidModelSpec`] for unusable bounds or start.
/// - [`CoatingError::ConvergenceFailed`] when the iteration cap is reached.
/// - [`CoatingError::Optimizer`] for any other solver failure.
/// - [`CoatingError::Inference`] if the covariance inputs are non-finite.
pub fn fit_objective(
    objective: Objective, data: &FeatureMatrix, opts: &FitOptions,
) -> CoatingResult<FitResult> {
    let spec = opts.spec;
    let bounds = spec.bounds()?;
    let lsq = CoatingLsq::new(objective, spec, data);
    let optimizer_err = |source| CoatingError::Optimizer { objective, source };

    let outcome = minimize(&lsq, opts.start().to_theta(), data, &bounds, &opts.lsq)
        .map_err(optimizer_err)?;
    if !outcome.converged {
        return Err(CoatingError::ConvergenceFailed { objective, status: outcome.status });
    }
    let params = CoatingParams::from_theta(&outcome.theta_hat)?;

    let predictions = spec.predict_batch(data.x().view(), &params);
    let ratios = &predictions / data.targets();
    let score = score_from_ratios(&ratios);

    let jacobian = lsq.jacobian(&outcome.theta_hat, data).map_err(optimizer_err)?;
    let residuals = lsq.residuals(&outcome.theta_hat, data).map_err(optimizer_err)?;
    let covariance = least_squares_covariance(&jacobian, &residuals)?;

    info!(
        "{objective} fit: {params}, score = {score:.4}, {} iterations ({})",
        outcome.iterations, outcome.status
    );
    Ok(FitResult {
        objective,
        params,
        score,
        cost: outcome.value,
        predictions,
        ratios,
        covariance,
        iterations: outcome.iterations,
        status: outcome.status,
    })
}

/// Fit both objectives; the first failure aborts.
pub fn fit_both(data: &FeatureMatrix, opts: &FitOptions) -> CoatingResult<FitPair> {
    let absolute = fit_objective(Objective::Absolute, data, opts)?;
    let relative = fit_objective(Objective::Relative, data, opts)?;
    Ok(FitPair { absolute, relative })
}
