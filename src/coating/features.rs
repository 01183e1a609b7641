//! Feature extraction: recipe mould lists → `(x0, x1)`.
//!
//! For a recipe referencing moulds `m_1 … m_k` (duplicates allowed):
//!
//! - `x0 = Σ count(m) · weight(m)` (total cavity mass),
//! - `x1 = Σ count(m) · weight(m)^(2/3)` (surface proxy).
//!
//! Every occurrence is resolved and summed independently, so a mould listed
//! twice contributes twice.
use log::debug;
use ndarray::{Array1, Array2, ArrayView1};

use crate::{
    catalog::{CatalogResult, MouldCatalog},
    coating::{
        errors::{CoatingError, CoatingResult},
        recipe::{Recipe, RecipeSet},
    },
};

/// Aggregate geometric features of one recipe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Features {
    pub x0: f64,
    pub x1: f64,
}

impl Features {
    pub fn is_zero(&self) -> bool {
        self.x0 == 0.0 && self.x1 == 0.0
    }
}

/// Sum the mass and surface terms of the given mould references.
///
/// # Errors
/// Propagates the first failed lookup.
pub fn mould_features<S: AsRef<str>>(
    moulds: &[S], catalog: &MouldCatalog,
) -> CatalogResult<Features> {
    moulds.iter().try_fold(Features::default(), |acc, reference| {
        let mould = catalog.find(reference.as_ref())?;
        Ok(Features { x0: acc.x0 + mould.mass(), x1: acc.x1 + mould.surface() })
    })
}

/// Features of a single recipe.
pub fn extract_features(recipe: &Recipe, catalog: &MouldCatalog) -> CatalogResult<Features> {
    mould_features(recipe.moulds.as_slice(), catalog)
}

/// `N × 2` feature matrix (`[x0, x1]` per row) with the matching targets.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    x: Array2<f64>,
    targets: Array1<f64>,
}

impl FeatureMatrix {
    /// Build from raw arrays.
    ///
    /// # Errors
    /// - [`CoatingError::EmptyDataset`] when there are no rows.
    /// - [`CoatingError::FeatureShapeMismatch`] unless `x` is `N×2` with `N`
    ///   targets.
    /// - [`CoatingError::DegenerateInput`] for a zero or non-finite target,
    ///   negative or non-finite features, or an all-zero feature row.
    pub fn new(x: Array2<f64>, targets: Array1<f64>) -> CoatingResult<Self> {
        let (rows, cols) = x.dim();
        if cols != 2 || rows != targets.len() {
            return Err(CoatingError::FeatureShapeMismatch { rows, cols, targets: targets.len() });
        }
        if rows == 0 {
            return Err(CoatingError::EmptyDataset);
        }
        for (i, (row, &target)) in x.rows().into_iter().zip(targets.iter()).enumerate() {
            let degenerate = |reason| CoatingError::DegenerateInput {
                recipe: i,
                note: crate::coating::recipe::MISSING_NOTE.to_string(),
                reason,
            };
            if !target.is_finite() || target == 0.0 {
                return Err(degenerate("target weight is zero or non-finite"));
            }
            if row.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(degenerate("features must be finite and non-negative"));
            }
            if row.iter().all(|v| *v == 0.0) {
                return Err(degenerate("all features are zero"));
            }
        }
        Ok(Self { x, targets })
    }

    /// Resolve every recipe against the catalog.
    ///
    /// # Errors
    /// - [`CoatingError::UnknownMould`] naming the first recipe with an
    ///   unresolvable reference. No partial matrix is returned.
    /// - [`CoatingError::DegenerateInput`] for a recipe with all-zero
    ///   features.
    pub fn from_recipes(recipes: &RecipeSet, catalog: &MouldCatalog) -> CoatingResult<Self> {
        let n = recipes.len();
        let mut x = Array2::<f64>::zeros((n, 2));
        let mut targets = Array1::<f64>::zeros(n);
        for (i, recipe) in recipes.iter().enumerate() {
            let features = extract_features(recipe, catalog).map_err(|source| {
                CoatingError::UnknownMould { recipe: i, note: recipe.label().to_string(), source }
            })?;
            if features.is_zero() {
                return Err(CoatingError::DegenerateInput {
                    recipe: i,
                    note: recipe.label().to_string(),
                    reason: "all features are zero",
                });
            }
            debug!(
                "recipe {i} ('{}'): x0 = {:.3}, x1 = {:.3}, target = {:.3}",
                recipe.label(),
                features.x0,
                features.x1,
                recipe.target()
            );
            x[[i, 0]] = features.x0;
            x[[i, 1]] = features.x1;
            targets[i] = recipe.target();
        }
        Self::new(x, targets)
    }

    pub fn n_obs(&self) -> usize {
        self.targets.len()
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn x0(&self) -> ArrayView1<'_, f64> {
        self.x.column(0)
    }

    pub fn x1(&self) -> ArrayView1<'_, f64> {
        self.x.column(1)
    }

    pub fn targets(&self) -> &Array1<f64> {
        &self.targets
    }

    pub fn row(&self, i: usize) -> Features {
        Features { x0: self.x[[i, 0]], x1: self.x[[i, 1]] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Cavity, Mould};
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The concrete single-mould feature values.
    // - Additivity for repeated mould references.
    // - Lookup failures naming the offending recipe.
    // - Shape and degeneracy checks in `FeatureMatrix::new`.
    // -------------------------------------------------------------------------

    fn catalog() -> MouldCatalog {
        MouldCatalog::new(vec![
            Mould {
                name: "M1".to_string(),
                model: String::new(),
                cavity: Cavity { weight: 50.0, layout: [2, 1] },
            },
            Mould {
                name: "M2".to_string(),
                model: "1143".to_string(),
                cavity: Cavity { weight: 8.0, layout: [3, 7] },
            },
        ])
        .expect("valid catalog")
    }

    fn recipe(moulds: &[&str], weight: f64) -> Recipe {
        Recipe {
            moulds: moulds.iter().map(|m| m.to_string()).collect(),
            weight,
            relation: 1.0,
            shell: None,
            note: Some("test".to_string()),
        }
    }

    #[test]
    // Purpose
    // -------
    // Concrete scenario: one mould with weight 50 and layout [2, 1].
    //
    // Expect
    // ------
    // - `x0 = 100`, `x1 = 2·50^(2/3) ≈ 27.14`.
    fn single_mould_features() {
        let f = extract_features(&recipe(&["M1"], 100.0), &catalog()).expect("lookup");

        assert_relative_eq!(f.x0, 100.0);
        assert_relative_eq!(f.x1, 27.14, epsilon = 5e-3);
    }

    #[test]
    // Purpose
    // -------
    // A mould referenced `k` times contributes exactly `k` times.
    fn repeated_moulds_are_additive() {
        let cat = catalog();
        let once = extract_features(&recipe(&["1143"], 1.0), &cat).expect("lookup");
        let thrice =
            extract_features(&recipe(&["M2", "1143", "M2"], 1.0), &cat).expect("lookup");

        assert_relative_eq!(thrice.x0, 3.0 * once.x0, max_relative = 1e-12);
        assert_relative_eq!(thrice.x1, 3.0 * once.x1, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // An unknown mould aborts the whole matrix and names the recipe.
    fn unknown_mould_names_recipe() {
        let recipes =
            RecipeSet::new(vec![recipe(&["M1"], 100.0), recipe(&["M1", "nope"], 80.0)])
                .expect("valid recipes");

        let err = FeatureMatrix::from_recipes(&recipes, &catalog()).unwrap_err();

        assert!(matches!(err, CoatingError::UnknownMould { recipe: 1, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Raw matrices are checked for shape, zero targets and zero rows.
    fn new_validates_shape_and_degeneracy() {
        assert!(matches!(
            FeatureMatrix::new(array![[1.0, 2.0, 3.0]], array![1.0]),
            Err(CoatingError::FeatureShapeMismatch { .. })
        ));
        assert!(matches!(
            FeatureMatrix::new(array![[1.0, 2.0]], array![0.0]),
            Err(CoatingError::DegenerateInput { recipe: 0, .. })
        ));
        assert!(matches!(
            FeatureMatrix::new(array![[1.0, 2.0], [0.0, 0.0]], array![1.0, 1.0]),
            Err(CoatingError::DegenerateInput { recipe: 1, .. })
        ));

        let fm = FeatureMatrix::new(array![[100.0, 27.14]], array![100.0]).expect("valid");
        assert_eq!(fm.n_obs(), 1);
        assert_eq!(fm.row(0), Features { x0: 100.0, x1: 27.14 });
    }
}
