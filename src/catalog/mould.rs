//! Mould records as they appear in the catalog source.
//!
//! A mould is identified by a `name` and/or a `model` string and carries the
//! geometry of one cavity plus the `[rows, cols]` layout of cavities on the
//! mould. Everything the feature extractor needs is derived here:
//!
//! - cavity count `= layout[0] · layout[1]`,
//! - mass term `= count · weight`,
//! - surface proxy `= count · weight^(2/3)`.
use serde::{Deserialize, Serialize};

use crate::catalog::errors::{CatalogError, CatalogResult};

/// Exponent turning a cavity mass into a surface-area proxy.
pub const SURFACE_EXPONENT: f64 = 2.0 / 3.0;

/// Geometry of a single cavity and how many of them a mould holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cavity {
    pub weight: f64,
    pub layout: [u32; 2],
}

impl Cavity {
    pub fn count(&self) -> u32 {
        self.layout[0] * self.layout[1]
    }

    /// `weight^(2/3)` for one cavity.
    pub fn surface_proxy(&self) -> f64 {
        self.weight.powf(SURFACE_EXPONENT)
    }
}

/// One catalog entry.
///
/// Unknown fields in the source record are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mould {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: String,
    pub cavity: Cavity,
}

impl Mould {
    /// Exact, case-sensitive match against `name` or `model`. Empty
    /// identifiers never match.
    pub fn matches(&self, query: &str) -> bool {
        (!self.name.is_empty() && self.name == query)
            || (!self.model.is_empty() && self.model == query)
    }

    /// Label used in logs and error messages.
    pub fn label(&self) -> &str {
        if self.name.is_empty() { &self.model } else { &self.name }
    }

    /// Total material held by the mould: `count · weight`.
    pub fn mass(&self) -> f64 {
        f64::from(self.cavity.count()) * self.cavity.weight
    }

    /// Surface proxy of the mould: `count · weight^(2/3)`.
    pub fn surface(&self) -> f64 {
        f64::from(self.cavity.count()) * self.cavity.surface_proxy()
    }

    /// Validate a record loaded from the catalog source.
    ///
    /// # Errors
    /// - [`CatalogError::MissingIdentity`] if both identifiers are empty.
    /// - [`CatalogError::InvalidCavityWeight`] for non-finite or non-positive
    ///   cavity weights.
    /// - [`CatalogError::InvalidLayout`] if a layout entry is zero.
    pub fn validate(&self, index: usize) -> CatalogResult<()> {
        if self.name.is_empty() && self.model.is_empty() {
            return Err(CatalogError::MissingIdentity { index });
        }
        let weight = self.cavity.weight;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(CatalogError::InvalidCavityWeight {
                mould: self.label().to_string(),
                value: weight,
            });
        }
        if self.cavity.layout.contains(&0) {
            return Err(CatalogError::InvalidLayout {
                mould: self.label().to_string(),
                layout: self.cavity.layout,
            });
        }
        Ok(())
    }
}
