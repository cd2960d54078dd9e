//! Error types for flowline-core.

use flowline_color::{EmptyPaletteError, ParseColorError};
use thiserror::Error;

/// Invalid run or controller configuration.
///
/// Always raised while building a run, before any particle is stepped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A function name is not registered for the controller.
    #[error("unknown {controller} function: {name:?}")]
    UnknownFunction {
        /// Controller name.
        controller: &'static str,
        /// The unrecognized function name.
        name: String,
    },

    /// A mux was named as a sub-function of another mux.
    #[error("{controller}: mux {name:?} cannot be used as a mux input")]
    NestedMux {
        /// Controller name.
        controller: &'static str,
        /// The offending mux name.
        name: String,
    },

    /// A mux was selected without both sub-functions.
    #[error("{controller}: {mux} requires two input functions")]
    MissingMuxInput {
        /// Controller name.
        controller: &'static str,
        /// The mux name.
        mux: String,
    },

    /// A controller has no functions to choose from.
    #[error("{controller} has no registered functions")]
    EmptyRegistry {
        /// Controller name.
        controller: &'static str,
    },

    /// A range has its minimum above its maximum.
    #[error("invalid range for {field}: min {min} > max {max}")]
    InvalidRange {
        /// Field name.
        field: &'static str,
        /// Minimum value.
        min: f64,
        /// Maximum value.
        max: f64,
    },

    /// A value is below its allowed minimum.
    #[error("{field} must be at least {minimum}, got {value}")]
    BelowMinimum {
        /// Field name.
        field: &'static str,
        /// Smallest allowed value.
        minimum: f64,
        /// The supplied value.
        value: f64,
    },

    /// A palette has no colors.
    #[error("palette is empty")]
    EmptyPalette,

    /// A color string failed to parse.
    #[error(transparent)]
    InvalidColor(#[from] ParseColorError),
}

impl From<EmptyPaletteError> for ConfigError {
    fn from(_: EmptyPaletteError) -> Self {
        ConfigError::EmptyPalette
    }
}

impl ConfigError {
    /// Checks `min <= max`.
    pub fn check_range(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
        if min > max || min.is_nan() || max.is_nan() {
            return Err(ConfigError::InvalidRange { field, min, max });
        }
        Ok(())
    }

    /// Checks `value >= minimum`.
    pub fn check_minimum(field: &'static str, value: f64, minimum: f64) -> Result<(), ConfigError> {
        if value.is_nan() || value < minimum {
            return Err(ConfigError::BelowMinimum {
                field,
                minimum,
                value,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(ConfigError::check_range("size", 1.0, 1.0).is_ok());
        assert!(matches!(
            ConfigError::check_range("size", 2.0, 1.0),
            Err(ConfigError::InvalidRange { field: "size", .. })
        ));
    }

    #[test]
    fn test_check_minimum_rejects_nan() {
        assert!(ConfigError::check_minimum("lifespan", 1.0, 1.0).is_ok());
        assert!(ConfigError::check_minimum("lifespan", 0.5, 1.0).is_err());
        assert!(ConfigError::check_minimum("lifespan", f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_display() {
        let err = ConfigError::UnknownFunction {
            controller: "angle",
            name: "Swirl".into(),
        };
        assert_eq!(err.to_string(), "unknown angle function: \"Swirl\"");
    }
}
