//! Physical model of coating weight.
//!
//! Purpose
//! -------
//! Map recipe features and parameters to a predicted coating weight:
//!
//! `v = A·x0 − B·x1 + s·C`
//!
//! where `s` is the offset scale (default 100). This is the only place the
//! model formula lives; both fit objectives and the landscape scan go
//! through [`ModelSpec::predict_batch`].
//!
//! Conventions
//! -----------
//! - Parameters are ordered `(A, B, C)` whenever they travel as a vector.
//! - Default bounds are `A ∈ [0, 3]`, `B ∈ [0, 1]`, `C ∈ [−3, 3]`. They are
//!   a plausibility prior for this dataset's units and can be overridden.
use ndarray::{Array1, Array2, ArrayView2, array};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::MouldCatalog,
    coating::{
        errors::{CoatingError, CoatingResult},
        features::{Features, mould_features},
    },
    optimization::{lsq_optimizer::Theta, numerical_stability::BoxBounds},
};

/// Number of free model parameters.
pub const N_PARAMS: usize = 3;

pub const DEFAULT_OFFSET_SCALE: f64 = 100.0;

/// Model parameters `(A, B, C)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoatingParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl CoatingParams {
    /// Baseline guess used for comparison scores.
    pub const REFERENCE: CoatingParams = CoatingParams { a: 0.9, b: 0.1, c: 0.0 };

    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    pub fn to_theta(&self) -> Theta {
        array![self.a, self.b, self.c]
    }

    /// # Errors
    /// [`CoatingError::InvalidModelSpec`] unless `theta` has length 3.
    pub fn from_theta(theta: &Theta) -> CoatingResult<Self> {
        match theta.as_slice() {
            Some(&[a, b, c]) => Ok(Self { a, b, c }),
            _ => Err(CoatingError::InvalidModelSpec {
                reason: format!("expected {N_PARAMS} parameters, got {}", theta.len()),
            }),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }
}

impl std::fmt::Display for CoatingParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(A = {:.6}, B = {:.6}, C = {:.6})", self.a, self.b, self.c)
    }
}

/// Model constants: the offset scale and the parameter box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSpec {
    pub offset_scale: f64,
    pub lower: CoatingParams,
    pub upper: CoatingParams,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            offset_scale: DEFAULT_OFFSET_SCALE,
            lower: CoatingParams::new(0.0, 0.0, -3.0),
            upper: CoatingParams::new(3.0, 1.0, 3.0),
        }
    }
}

impl ModelSpec {
    /// Construct and validate a model specification.
    ///
    /// # Errors
    /// See [`ModelSpec::validate`].
    pub fn new(
        offset_scale: f64, lower: CoatingParams, upper: CoatingParams,
    ) -> CoatingResult<Self> {
        let spec = Self { offset_scale, lower, upper };
        spec.validate()?;
        Ok(spec)
    }

    /// # Errors
    /// [`CoatingError::InvalidModelSpec`] when the offset scale is zero or
    /// non-finite, or a bound pair is non-finite or not strictly increasing.
    pub fn validate(&self) -> CoatingResult<()> {
        if !self.offset_scale.is_finite() || self.offset_scale == 0.0 {
            return Err(CoatingError::InvalidModelSpec {
                reason: format!("offset scale must be finite and non-zero, got {}", self.offset_scale),
            });
        }
        self.bounds().map(|_| ())
    }

    /// Parameter box in `(A, B, C)` order.
    pub fn bounds(&self) -> CoatingResult<BoxBounds> {
        BoxBounds::new(self.lower.to_theta(), self.upper.to_theta())
            .map_err(|err| CoatingError::InvalidModelSpec { reason: err.to_string() })
    }

    /// `true` when `params` lies inside the box.
    pub fn contains(&self, params: &CoatingParams) -> bool {
        let p = params.to_theta();
        let lo = self.lower.to_theta();
        let hi = self.upper.to_theta();
        p.iter().zip(lo.iter().zip(hi.iter())).all(|(&v, (&l, &h))| v >= l && v <= h)
    }

    /// Box midpoint, the default starting point for fits.
    pub fn midpoint(&self) -> CoatingParams {
        CoatingParams::new(
            0.5 * (self.lower.a + self.upper.a),
            0.5 * (self.lower.b + self.upper.b),
            0.5 * (self.lower.c + self.upper.c),
        )
    }

    /// `A·x0 − B·x1 + s·C` for one feature vector.
    pub fn predict(&self, features: Features, params: &CoatingParams) -> f64 {
        params.a * features.x0 - params.b * features.x1 + self.offset_scale * params.c
    }

    /// Vectorized prediction over the rows of an `N×2` feature matrix.
    pub fn predict_batch(&self, x: ArrayView2<'_, f64>, params: &CoatingParams) -> Array1<f64> {
        let offset = self.offset_scale * params.c;
        x.rows().into_iter().map(|row| params.a * row[0] - params.b * row[1] + offset).collect()
    }

    /// `∂v/∂(A, B, C)` per row: `[x0, −x1, s]`.
    pub fn jacobian(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut jac = Array2::<f64>::from_elem((x.nrows(), N_PARAMS), self.offset_scale);
        jac.column_mut(0).assign(&x.column(0));
        jac.column_mut(1).assign(&x.column(1).mapv(|v| -v));
        jac
    }
}

/// Predicted coating weight for an arbitrary mould configuration.
///
/// # Errors
/// [`CoatingError::Catalog`] if a mould reference does not resolve.
pub fn predict_configuration<S: AsRef<str>>(
    catalog: &MouldCatalog, moulds: &[S], params: &CoatingParams, spec: &ModelSpec,
) -> CoatingResult<f64> {
    let features = mould_features(moulds, catalog)?;
    Ok(spec.predict(features, params))
}
