//! Fit-time configuration.
//!
//! [`FitOptions`] bundles the model constants ([`ModelSpec`]), the solver
//! settings ([`LsqOptions`]) and an optional starting point. Without a
//! starting point both fits start from the box midpoint.
use crate::{
    coating::{
        errors::{CoatingError, CoatingResult},
        model::{CoatingParams, ModelSpec},
    },
    optimization::lsq_optimizer::LsqOptions,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitOptions {
    pub spec: ModelSpec,
    pub lsq: LsqOptions,
    pub initial_guess: Option<CoatingParams>,
}

impl FitOptions {
    /// Construct validated fit options.
    ///
    /// # Errors
    /// - [`CoatingError::InvalidModelSpec`] for an invalid [`ModelSpec`] or
    ///   an initial guess outside its bounds.
    pub fn new(
        spec: ModelSpec, lsq: LsqOptions, initial_guess: Option<CoatingParams>,
    ) -> CoatingResult<Self> {
        spec.validate()?;
        if let Some(guess) = initial_guess {
            if !guess.is_finite() || !spec.contains(&guess) {
                return Err(CoatingError::InvalidModelSpec {
                    reason: format!("initial guess {guess} lies outside the parameter bounds"),
                });
            }
        }
        Ok(Self { spec, lsq, initial_guess })
    }

    /// Starting point for the solver.
    pub fn start(&self) -> CoatingParams {
        self.initial_guess.unwrap_or_else(|| self.spec.midpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The start defaults to the box midpoint; guesses outside the box are
    // rejected.
    fn start_defaults_to_midpoint_and_guess_is_checked() {
        let opts = FitOptions::default();
        assert_eq!(opts.start(), CoatingParams::new(1.5, 0.5, 0.0));

        let inside = FitOptions::new(
            ModelSpec::default(),
            LsqOptions::default(),
            Some(CoatingParams::REFERENCE),
        )
        .expect("reference guess is feasible");
        assert_eq!(inside.start(), CoatingParams::REFERENCE);

        assert!(matches!(
            FitOptions::new(
                ModelSpec::default(),
                LsqOptions::default(),
                Some(CoatingParams::new(0.5, 2.0, 0.0)),
            ),
            Err(CoatingError::InvalidModelSpec { .. })
        ));
    }
}
