//! # Error Types
//!
//! Structured error types for gdt_core. An error here always means the
//! *input record* is malformed (a non-finite tolerance, an empty datum label).
//! A callout that breaks a GD&T rule is not an error: it is reported as an
//! issue inside [`GdtValidationResult`](crate::results::GdtValidationResult).
//!
//! ## Example
//!
//! ```rust
//! use gdt_core::errors::{GdtError, GdtResult};
//!
//! fn validate_tolerance(value: f64) -> GdtResult<()> {
//!     if !(value > 0.0) {
//!         return Err(GdtError::InvalidInput {
//!             field: "tolerance_value".to_string(),
//!             value: value.to_string(),
//!             reason: "Tolerance must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for gdt_core operations
pub type GdtResult<T> = Result<T, GdtError>;

/// Structured error type for malformed GD&T input.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum GdtError {
    /// An input value is invalid (non-finite, non-positive, empty label, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Manufacturing process name not found in the capability table
    #[error("Unknown manufacturing process: {name}")]
    UnknownProcess { name: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl GdtError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        GdtError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        GdtError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownProcess error
    pub fn unknown_process(name: impl Into<String>) -> Self {
        GdtError::UnknownProcess { name: name.into() }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            GdtError::InvalidInput { .. } => "INVALID_INPUT",
            GdtError::MissingField { .. } => "MISSING_FIELD",
            GdtError::UnknownProcess { .. } => "UNKNOWN_PROCESS",
            GdtError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for GdtError {
    fn from(err: serde_json::Error) -> Self {
        GdtError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// Reject NaN, infinities and values that are not strictly positive.
pub(crate) fn require_positive(field: &str, value: f64) -> GdtResult<()> {
    if !value.is_finite() {
        return Err(GdtError::invalid_input(field, value.to_string(), "Value must be finite"));
    }
    if value <= 0.0 {
        return Err(GdtError::invalid_input(field, value.to_string(), "Value must be positive"));
    }
    Ok(())
}

/// Reject NaN, infinities and negative values. Zero is allowed.
pub(crate) fn require_non_negative(field: &str, value: f64) -> GdtResult<()> {
    if !value.is_finite() {
        return Err(GdtError::invalid_input(field, value.to_string(), "Value must be finite"));
    }
    if value < 0.0 {
        return Err(GdtError::invalid_input(field, value.to_string(), "Value must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = GdtError::invalid_input("tolerance_value", "-0.005", "Value must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: GdtError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
        assert!(json.contains("\"type\":\"InvalidInput\""));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(GdtError::missing_field("feature_size").error_code(), "MISSING_FIELD");
        assert_eq!(GdtError::unknown_process("welding").error_code(), "UNKNOWN_PROCESS");
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("tolerance_value", 0.010).is_ok());
        assert!(require_positive("tolerance_value", 0.0).is_err());
        assert!(require_positive("tolerance_value", f64::NAN).is_err());
        assert!(require_positive("tolerance_value", f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("feature_size_tolerance", 0.0).is_ok());
        assert!(require_non_negative("feature_size_tolerance", -0.001).is_err());
    }
}
