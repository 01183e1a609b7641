//! The two least-squares encodings of "good fit" and the shared score.
//!
//! Purpose
//! -------
//! Express the absolute-error and relative-error problems as
//! [`LeastSquares`] residual models over the same [`ModelSpec`], and define
//! the scalar diagnostic
//!
//! `score(θ) = log10( mean( (pred_i / target_i − 1)² ) )`
//!
//! used by the fitter, the report and the landscape scan alike.
//!
//! Key behaviors
//! -------------
//! - [`Objective::Absolute`]: residuals `(pred_i − target_i) / rms(target)`.
//!   The constant divisor leaves the minimiser unchanged and makes solver
//!   tolerances independent of the weight unit.
//! - [`Objective::Relative`]: residuals `pred_i / target_i − 1`. The mean
//!   squared residual is exactly `10^score`.
//! - Both provide an analytic Jacobian built from [`ModelSpec::jacobian`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Targets are finite and non-zero (enforced by `FeatureMatrix::new`), so
//!   no division here can produce `NaN` or `±inf`.
//! - `score` is `−inf` for a perfect fit; callers serialize it as-is.
use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{
    coating::{
        features::FeatureMatrix,
        model::{CoatingParams, ModelSpec, N_PARAMS},
    },
    optimization::{
        errors::{OptError, OptResult},
        lsq_optimizer::{Jacobian, LeastSquares, Residuals, Theta},
    },
};

/// Which error the fit minimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    Absolute,
    Relative,
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Objective::Absolute => write!(f, "absolute-error"),
            Objective::Relative => write!(f, "relative-error"),
        }
    }
}

/// Residual model for one objective, ready to hand to the optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoatingLsq {
    pub objective: Objective,
    pub spec: ModelSpec,
    residual_scale: f64,
}

impl CoatingLsq {
    pub fn new(objective: Objective, spec: ModelSpec, data: &FeatureMatrix) -> Self {
        let residual_scale = match objective {
            Objective::Absolute => rms(data.targets()),
            Objective::Relative => 1.0,
        };
        Self { objective, spec, residual_scale }
    }

    fn params(theta: &Theta) -> OptResult<CoatingParams> {
        match theta.as_slice() {
            Some(&[a, b, c]) => Ok(CoatingParams::new(a, b, c)),
            _ => Err(OptError::ThetaLengthMismatch { expected: N_PARAMS, actual: theta.len() }),
        }
    }
}

impl LeastSquares for CoatingLsq {
    type Data = FeatureMatrix;

    fn residuals(&self, theta: &Theta, data: &FeatureMatrix) -> OptResult<Residuals> {
        let params = Self::params(theta)?;
        let pred = self.spec.predict_batch(data.x().view(), &params);
        let residuals = match self.objective {
            Objective::Absolute => (pred - data.targets()) / self.residual_scale,
            Objective::Relative => pred / data.targets() - 1.0,
        };
        Ok(residuals)
    }

    fn check(&self, theta: &Theta, data: &FeatureMatrix) -> OptResult<()> {
        Self::params(theta)?;
        if data.n_obs() == 0 {
            return Err(OptError::EmptyResiduals);
        }
        Ok(())
    }

    fn jacobian(&self, _theta: &Theta, data: &FeatureMatrix) -> OptResult<Jacobian> {
        let mut jac = self.spec.jacobian(data.x().view());
        match self.objective {
            Objective::Absolute => jac /= self.residual_scale,
            Objective::Relative => {
                for (mut row, &t) in jac.rows_mut().into_iter().zip(data.targets().iter()) {
                    row /= t;
                }
            }
        }
        Ok(jac)
    }
}

/// Root mean square of `values`; `1` for an all-zero or empty input.
fn rms(values: &Array1<f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 1.0;
    }
    let r = (values.dot(values) / n as f64).sqrt();
    if r > 0.0 && r.is_finite() { r } else { 1.0 }
}

/// `pred_i / target_i` for every row.
pub fn ratios(
    x: ArrayView2<'_, f64>, targets: &Array1<f64>, params: &CoatingParams, spec: &ModelSpec,
) -> Array1<f64> {
    spec.predict_batch(x, params) / targets
}

/// `log10(mean((r_i − 1)²))` over a vector of ratios.
pub fn score_from_ratios(ratios: &Array1<f64>) -> f64 {
    let n = ratios.len() as f64;
    let mse = ratios.iter().map(|r| (r - 1.0).powi(2)).sum::<f64>() / n;
    mse.log10()
}

/// Score of `params` over a feature matrix.
pub fn score(data: &FeatureMatrix, params: &CoatingParams, spec: &ModelSpec) -> f64 {
    score_from_ratios(&ratios(data.x().view(), data.targets(), params, spec))
}
