//! Errors raised while loading or querying the mould catalog.
//!
//! ## Conventions
//! - Record indices are **0-based** positions in the catalog source.
//! - Parse failures keep only the rendered `serde_json` message so the error
//!   stays `Clone + PartialEq`.

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    // ---- Lookup ----
    /// No entry has `name` or `model` equal to the query.
    MouldNotFound { query: String },

    /// More than one entry matches the query.
    AmbiguousMould { query: String, matches: usize },

    // ---- Record validation ----
    /// A record has neither a `name` nor a `model`.
    MissingIdentity { index: usize },

    /// Cavity weight must be finite and > 0.
    InvalidCavityWeight { mould: String, value: f64 },

    /// Both layout entries must be > 0.
    InvalidLayout { mould: String, layout: [u32; 2] },

    // ---- Source ----
    /// The catalog source could not be parsed.
    Parse { message: String },
}

impl std::error::Error for CatalogError {}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::MouldNotFound { query } => {
                write!(f, "Could not find any mould with the name or model '{query}'")
            }
            CatalogError::AmbiguousMould { query, matches } => {
                write!(f, "Mould reference '{query}' is ambiguous: {matches} catalog entries match")
            }
            CatalogError::MissingIdentity { index } => {
                write!(f, "Catalog record {index} has neither a name nor a model")
            }
            CatalogError::InvalidCavityWeight { mould, value } => {
                write!(f, "Mould '{mould}' has an invalid cavity weight {value}; must be finite and > 0")
            }
            CatalogError::InvalidLayout { mould, layout } => {
                write!(
                    f,
                    "Mould '{mould}' has an invalid cavity layout [{}, {}]; both entries must be > 0",
                    layout[0], layout[1]
                )
            }
            CatalogError::Parse { message } => {
                write!(f, "Failed to parse mould catalog: {message}")
            }
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse { message: err.to_string() }
    }
}
