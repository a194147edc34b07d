//! Engine error conditions.
//!
//! Only three things can go wrong inside the engine: a use-case call is
//! missing a required record, a numeric setting would produce a non-finite
//! timing, or (strict entry points only) an input lies outside its domain.
//! Simulation safety caps are not errors; reports carry a `capped` flag.

use crate::catalog::CatalogError;

/// Errors surfaced by the growth/feeding engine.
#[derive(Debug, thiserror::Error)]
pub enum NurseryError {
    /// A required record (species, food item) was not supplied.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// A setting or catalog value would make a timing infinite or undefined.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An input value is outside its domain. Only returned by strict entry
    /// points; lenient entry points normalize instead.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    /// A catalog lookup or build failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Reject zero, negative, or non-finite divisors.
///
/// Used by every formula that divides by a server or species rate so that
/// callers never see `inf`/`NaN` leak out of the engine.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64, NurseryError> {
    if value.is_finite() && value > f64::EPSILON {
        Ok(value)
    } else {
        Err(NurseryError::InvalidConfiguration(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_positive_accepts_small_positive() {
        assert_eq!(require_positive("agespeed", 0.000003).unwrap(), 0.000003);
    }

    #[test]
    fn require_positive_rejects_zero_negative_and_nan() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-20] {
            let err = require_positive("hatchSpeed", bad).unwrap_err();
            assert!(matches!(err, NurseryError::InvalidConfiguration(_)), "{bad}");
        }
    }

    #[test]
    fn error_display_messages() {
        let e = NurseryError::MissingInput("species");
        assert_eq!(format!("{e}"), "missing input: species");

        let e = require_positive("maturationSpeed", 0.0).unwrap_err();
        let msg = format!("{e}");
        assert!(msg.contains("maturationSpeed"), "got: {msg}");

        let e = NurseryError::OutOfRange {
            field: "maturation_progress",
            value: 1.5,
        };
        assert!(format!("{e}").contains("maturation_progress"));
        assert!(format!("{e}").contains("1.5"));
    }
}
