//! coating — features, physical model and fitter for coating weights.
//!
//! Purpose
//! -------
//! Estimate the parameters of the coating-weight model
//! `v = A·x0 − B·x1 + s·C` from recorded recipes. This module owns the
//! domain side of the pipeline: recipe records, feature extraction against
//! the mould catalog, the model itself, the two least-squares objectives and
//! the fitter that runs them.
//!
//! Key behaviors
//! -------------
//! - [`RecipeSet`] validates recipes before any arithmetic: empty datasets,
//!   recipes without moulds, and non-positive weights or relations are
//!   rejected up front.
//! - [`FeatureMatrix::from_recipes`] resolves every mould reference and
//!   builds the `N×2` design with targets `weight · relation`.
//! - [`ModelSpec`] is the single home of the model formula and its bounds.
//! - [`fit_both`] solves the absolute-error and relative-error problems and
//!   returns a [`FitPair`].
//!
//! Invariants & assumptions
//! ------------------------
//! - No division in this module sees a zero or non-finite target.
//! - Fitted parameters always lie inside `ModelSpec` bounds.
//! - `score` is defined once ([`objective::score`]) and reused by the
//!   fitter, the report and the landscape scan.
//!
//! Conventions
//! -----------
//! - Parameters travel as [`CoatingParams`] in domain code and as `(A, B, C)`
//!   ordered `Theta` vectors at the optimizer boundary.
//! - Errors are [`CoatingError`] values naming the offending recipe or
//!   objective; nothing here panics.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover feature additivity, model monotonicity, residual
//!   and score definitions, Jacobian agreement with finite differences, and
//!   fits on synthetic data (interior, bound-active, single recipe).

pub mod errors;
pub mod features;
pub mod fitter;
pub mod model;
pub mod objective;
pub mod options;
pub mod recipe;

pub use self::errors::{CoatingError, CoatingResult};
pub use self::features::{FeatureMatrix, Features, extract_features, mould_features};
pub use self::fitter::{FitPair, FitResult, fit_both, fit_objective};
pub use self::model::{
    CoatingParams, DEFAULT_OFFSET_SCALE, ModelSpec, N_PARAMS, predict_configuration,
};
pub use self::objective::{CoatingLsq, Objective, ratios, score, score_from_ratios};
pub use self::options::FitOptions;
pub use self::recipe::{MISSING_NOTE, Recipe, RecipeSet};
