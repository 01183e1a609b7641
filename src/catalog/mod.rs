//! catalog — immutable lookup of mould definitions.
//!
//! Purpose
//! -------
//! Load the external list of mould records once, validate it, and resolve
//! the mould references used by recipes. The catalog is passed explicitly to
//! the feature extractor; nothing in the crate holds a global copy.
//!
//! Key behaviors
//! -------------
//! - [`MouldCatalog::from_json_str`] / [`MouldCatalog::from_reader`] parse a
//!   JSON array of `{name, model, cavity: {weight, layout}}` records.
//! - [`MouldCatalog::find`] resolves a reference against both `name` and
//!   `model`, exact and case-sensitive.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every stored mould has a positive, finite cavity weight and a layout
//!   with two non-zero entries.
//! - A reference resolves to exactly one entry; zero matches is
//!   [`CatalogError::MouldNotFound`], several is
//!   [`CatalogError::AmbiguousMould`]. Duplicate identifiers in the source
//!   are allowed at load time and only fail when actually referenced.
//! - The catalog is never mutated after construction.

pub mod errors;
pub mod mould;

use std::io::Read;

use log::debug;

pub use self::errors::{CatalogError, CatalogResult};
pub use self::mould::{Cavity, Mould, SURFACE_EXPONENT};

/// Read-only collection of validated moulds.
#[derive(Debug, Clone, PartialEq)]
pub struct MouldCatalog {
    moulds: Vec<Mould>,
}

impl MouldCatalog {
    /// Build a catalog from already-deserialized records.
    ///
    /// # Errors
    /// Returns the first record validation failure (see [`Mould::validate`]).
    pub fn new(moulds: Vec<Mould>) -> CatalogResult<Self> {
        for (index, mould) in moulds.iter().enumerate() {
            mould.validate(index)?;
        }
        debug!("loaded mould catalog with {} entries", moulds.len());
        Ok(Self { moulds })
    }

    /// Parse a JSON array of mould records.
    ///
    /// # Errors
    /// - [`CatalogError::Parse`] for malformed JSON or missing fields.
    /// - Any record validation error.
    pub fn from_json_str(source: &str) -> CatalogResult<Self> {
        let moulds: Vec<Mould> = serde_json::from_str(source)?;
        Self::new(moulds)
    }

    /// Parse a JSON array of mould records from a reader.
    pub fn from_reader<R: Read>(reader: R) -> CatalogResult<Self> {
        let moulds: Vec<Mould> = serde_json::from_reader(reader)?;
        Self::new(moulds)
    }

    /// Resolve a mould reference by `name` or `model`.
    ///
    /// # Errors
    /// - [`CatalogError::MouldNotFound`] if nothing matches.
    /// - [`CatalogError::AmbiguousMould`] if more than one entry matches.
    pub fn find(&self, name_or_model: &str) -> CatalogResult<&Mould> {
        let mut hits = self.moulds.iter().filter(|m| m.matches(name_or_model));
        let first = hits
            .next()
            .ok_or_else(|| CatalogError::MouldNotFound { query: name_or_model.to_string() })?;
        let extra = hits.count();
        if extra > 0 {
            return Err(CatalogError::AmbiguousMould {
                query: name_or_model.to_string(),
                matches: extra + 1,
            });
        }
        Ok(first)
    }

    pub fn len(&self) -> usize {
        self.moulds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moulds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mould> {
        self.moulds.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - JSON loading (including ignored extra fields).
    // - Lookup by name and by model, not-found and ambiguous queries.
    // - Validation errors surfacing from the loader.
    // -------------------------------------------------------------------------

    const SOURCE: &str = r#"[
        {"name": "halvsfär", "model": "1000L20", "cavity": {"weight": 10.0, "layout": [3, 8]}},
        {"name": "stock", "model": "2295", "brand": "x", "cavity": {"weight": 12.5, "layout": [4, 6]}},
        {"name": "pyramid", "model": "stock", "cavity": {"weight": 9.0, "layout": [3, 7]}}
    ]"#;

    #[test]
    // Purpose
    // -------
    // Lookups by `name` and by `model` return the same entry.
    //
    // Given
    // -----
    // - A three-entry catalog.
    //
    // Expect
    // ------
    // - `find("halvsfär")` and `find("1000L20")` are the same mould.
    fn find_by_name_and_model_agree() {
        // Arrange
        let catalog = MouldCatalog::from_json_str(SOURCE).expect("catalog should parse");

        // Act
        let by_name = catalog.find("halvsfär").expect("name lookup");
        let by_model = catalog.find("1000L20").expect("model lookup");

        // Assert
        assert_eq!(by_name, by_model);
        assert_eq!(by_name.cavity.count(), 24);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Absent and ambiguous references fail loudly.
    //
    // Given
    // -----
    // - "stock" is the `name` of one entry and the `model` of another.
    //
    // Expect
    // ------
    // - `find("stock")` → `AmbiguousMould { matches: 2 }`.
    // - `find("Stock")` → `MouldNotFound` (case-sensitive).
    fn find_reports_missing_and_ambiguous() {
        let catalog = MouldCatalog::from_json_str(SOURCE).expect("catalog should parse");

        assert_eq!(
            catalog.find("stock"),
            Err(CatalogError::AmbiguousMould { query: "stock".to_string(), matches: 2 })
        );
        assert_eq!(
            catalog.find("Stock"),
            Err(CatalogError::MouldNotFound { query: "Stock".to_string() })
        );
    }

    #[test]
    // Purpose
    // -------
    // Malformed sources and invalid records are rejected at load time.
    fn loader_rejects_bad_sources() {
        assert!(matches!(
            MouldCatalog::from_json_str(r#"[{"name": "a"}]"#),
            Err(CatalogError::Parse { .. })
        ));
        assert!(matches!(
            MouldCatalog::from_json_str(
                r#"[{"name": "a", "model": "b", "cavity": {"weight": -1, "layout": [1, 1]}}]"#
            ),
            Err(CatalogError::InvalidCavityWeight { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `from_reader` accepts any `Read` source.
    fn from_reader_parses_bytes() {
        let catalog = MouldCatalog::from_reader(SOURCE.as_bytes()).expect("catalog should parse");
        assert!(!catalog.is_empty());
        assert_eq!(catalog.iter().count(), 3);
    }
}
