//! Errors for loss-landscape grids.

/// Result alias for landscape operations.
pub type LandscapeResult<T> = Result<T, LandscapeError>;

#[derive(Debug, Clone, PartialEq)]
pub enum LandscapeError {
    /// Axis bounds must be finite with `start < stop`, step finite and > 0.
    InvalidAxis { axis: &'static str, start: f64, stop: f64, step: f64, reason: &'static str },

    /// The fixed `C` must be finite.
    NonFiniteFixedC { value: f64 },

    /// The requested grid would exceed the cell limit.
    GridTooLarge { cells: usize, max: usize },
}

impl std::error::Error for LandscapeError {}

impl std::fmt::Display for LandscapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandscapeError::InvalidAxis { axis, start, stop, step, reason } => {
                write!(f, "Invalid {axis} axis [{start}, {stop}) step {step}: {reason}")
            }
            LandscapeError::NonFiniteFixedC { value } => {
                write!(f, "Fixed C for the landscape scan must be finite; got {value}")
            }
            LandscapeError::GridTooLarge { cells, max } => {
                write!(f, "Landscape grid has {cells} cells; the limit is {max}")
            }
        }
    }
}
