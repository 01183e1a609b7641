//! Recipe records and the validated dataset handed to the fitter.
//!
//! A recipe lists the moulds that were filled, the recorded coating weight
//! and a `relation` factor mapping that weight to a full batch. The quantity
//! the model predicts is `target = weight · relation`.
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::coating::errors::{CoatingError, CoatingResult};

/// Label used for recipes without a note.
pub const MISSING_NOTE: &str = "?";

/// One recorded coating session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Mould references, in order; duplicates mean the mould was used twice.
    pub moulds: Vec<String>,
    pub weight: f64,
    pub relation: f64,
    /// Coating type (e.g. `"57%"`, `"white"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Recipe {
    /// `weight · relation`.
    pub fn target(&self) -> f64 {
        self.weight * self.relation
    }

    pub fn label(&self) -> &str {
        self.note.as_deref().unwrap_or(MISSING_NOTE)
    }

    /// Check that the recipe can enter a fit.
    ///
    /// # Errors
    /// - [`CoatingError::DegenerateInput`] when no moulds are listed or the
    ///   target is zero or non-finite.
    /// - [`CoatingError::InvalidWeight`] / [`CoatingError::InvalidRelation`]
    ///   for non-finite or non-positive values.
    pub fn validate(&self, index: usize) -> CoatingResult<()> {
        if self.moulds.is_empty() {
            return Err(CoatingError::DegenerateInput {
                recipe: index,
                note: self.label().to_string(),
                reason: "recipe references no moulds",
            });
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(CoatingError::InvalidWeight { recipe: index, value: self.weight });
        }
        if !self.relation.is_finite() || self.relation <= 0.0 {
            return Err(CoatingError::InvalidRelation { recipe: index, value: self.relation });
        }
        let target = self.target();
        if !target.is_finite() || target == 0.0 {
            return Err(CoatingError::DegenerateInput {
                recipe: index,
                note: self.label().to_string(),
                reason: "target weight is zero or non-finite",
            });
        }
        Ok(())
    }
}

/// Non-empty, validated collection of recipes for one fitting run.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSet {
    recipes: Vec<Recipe>,
}

impl RecipeSet {
    /// # Errors
    /// - [`CoatingError::EmptyDataset`] for an empty list.
    /// - The first per-recipe validation failure.
    pub fn new(recipes: Vec<Recipe>) -> CoatingResult<Self> {
        if recipes.is_empty() {
            return Err(CoatingError::EmptyDataset);
        }
        for (index, recipe) in recipes.iter().enumerate() {
            recipe.validate(index)?;
        }
        Ok(Self { recipes })
    }

    /// Parse a JSON array of recipe records.
    pub fn from_json_str(source: &str) -> CoatingResult<Self> {
        let recipes: Vec<Recipe> = serde_json::from_str(source)?;
        Self::new(recipes)
    }

    pub fn from_reader<R: Read>(reader: R) -> CoatingResult<Self> {
        let recipes: Vec<Recipe> = serde_json::from_reader(reader)?;
        Self::new(recipes)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }

    pub fn as_slice(&self) -> &[Recipe] {
        &self.recipes
    }
}

impl<'a> IntoIterator for &'a RecipeSet {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Target derivation and labels.
    // - Dataset-level and per-recipe validation.
    // - JSON parsing with optional fields.
    // -------------------------------------------------------------------------

    fn recipe(moulds: &[&str], weight: f64, relation: f64) -> Recipe {
        Recipe {
            moulds: moulds.iter().map(|m| m.to_string()).collect(),
            weight,
            relation,
            shell: None,
            note: None,
        }
    }

    #[test]
    // Purpose
    // -------
    // `target = weight · relation`, and a missing note is labelled "?".
    fn target_and_label() {
        let r = recipe(&["2295"], 603.5, 0.6);

        assert_relative_eq!(r.target(), 362.1, epsilon = 1e-9);
        assert_eq!(r.label(), "?");
    }

    #[test]
    // Purpose
    // -------
    // Recipes that would divide by zero or carry no features are rejected
    // before fitting.
    fn validation_rejects_degenerate_recipes() {
        assert!(matches!(
            recipe(&[], 10.0, 1.0).validate(2),
            Err(CoatingError::DegenerateInput { recipe: 2, .. })
        ));
        assert_eq!(
            recipe(&["a"], 0.0, 1.0).validate(0),
            Err(CoatingError::InvalidWeight { recipe: 0, value: 0.0 })
        );
        assert!(matches!(
            recipe(&["a"], 10.0, f64::NAN).validate(1),
            Err(CoatingError::InvalidRelation { recipe: 1, .. })
        ));
        assert_eq!(RecipeSet::new(Vec::new()), Err(CoatingError::EmptyDataset));
    }

    #[test]
    // Purpose
    // -------
    // JSON records parse with `shell` and `note` optional.
    fn parses_json_with_optional_fields() {
        let source = r#"[
            {"moulds": ["2295", "1143"], "shell": "57%", "weight": 560, "relation": 0.95,
             "note": "Amarettopraliner"},
            {"moulds": ["stock"], "weight": 338, "relation": 0.8}
        ]"#;

        let set = RecipeSet::from_json_str(source).expect("recipes should parse");

        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].shell.as_deref(), Some("57%"));
        assert_eq!(set.as_slice()[1].label(), MISSING_NOTE);
        assert!(matches!(RecipeSet::from_json_str("{}"), Err(CoatingError::Parse { .. })));
    }
}
