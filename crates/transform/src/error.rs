//! Transform error types

use thiserror::Error;

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

/// Errors that can occur during transformation.
///
/// Transformers only fail on violated preconditions; shape mismatches
/// inside `flatten` surface as [`TransformError::CastFailed`] from the
/// primitive but are downgraded to warnings by the built-in transformers.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A `require` rule found the key missing or null.
    #[error("missing required {section} field {field}")]
    MissingField {
        /// Which side of the metric was checked ("metadata" or "data").
        section: &'static str,
        field: String,
    },

    /// A `ban` rule found the key present.
    #[error("banned {section} field '{field}' present")]
    BannedField {
        section: &'static str,
        field: String,
    },

    /// A deprecated configuration field is in use.
    #[error("{0}")]
    Deprecated(String),

    /// Flatten encountered a value that is neither an object nor an array.
    #[error("cannot flatten {section} path '{path}': not an object or array")]
    CastFailed {
        section: &'static str,
        path: String,
    },

    /// Invalid transformer configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TransformError {
    /// Create a missing-required-field error.
    pub fn missing(section: &'static str, field: impl Into<String>) -> Self {
        Self::MissingField {
            section,
            field: field.into(),
        }
    }

    /// Create a banned-field error.
    pub fn banned(section: &'static str, field: impl Into<String>) -> Self {
        Self::BannedField {
            section,
            field: field.into(),
        }
    }

    /// Create a cast failure for a flatten path.
    pub fn cast_failed(section: &'static str, path: &[String]) -> Self {
        Self::CastFailed {
            section,
            path: path.join("."),
        }
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
