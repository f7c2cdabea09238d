//! # Error Types
//!
//! Structured error types for compbeam_core. Every failure carries enough
//! context (which check, which input) for the caller to correct the
//! configuration. Nothing here is retried: the computation is deterministic,
//! so every error is terminal for the current beam.
//!
//! ## Example
//!
//! ```rust
//! use compbeam_core::errors::{CalcError, CalcResult};
//!
//! fn validate_span(span_ft: f64) -> CalcResult<()> {
//!     if span_ft <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "span_ft",
//!             span_ft.to_string(),
//!             "Span must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(validate_span(-5.0).unwrap_err().error_code(), "INVALID_INPUT");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fea::FeaError;

/// Result type alias for compbeam_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, unknown enumeration value, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The section-property provider has no shape with this label
    #[error("Shape not found: {shape}")]
    ShapeNotFound { shape: String },

    /// The calculation has no implementation for this configuration
    #[error("Not supported: {calculation} - {reason}")]
    Unsupported {
        calculation: String,
        reason: String,
    },

    /// A finite-element demand was queried before `analyze()` ran
    #[error("Beam not yet analyzed: '{query}' requires analyze() to run first")]
    NotAnalyzed { query: String },

    /// The finite-element adapter rejected or failed to solve the model
    #[error(transparent)]
    Solver(#[from] FeaError),

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ShapeNotFound error
    pub fn shape_not_found(shape: impl Into<String>) -> Self {
        CalcError::ShapeNotFound {
            shape: shape.into(),
        }
    }

    /// Create an Unsupported error
    pub fn unsupported(calculation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Unsupported {
            calculation: calculation.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotAnalyzed error
    pub fn not_analyzed(query: impl Into<String>) -> Self {
        CalcError::NotAnalyzed {
            query: query.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::ShapeNotFound { .. } => "SHAPE_NOT_FOUND",
            CalcError::Unsupported { .. } => "UNSUPPORTED",
            CalcError::NotAnalyzed { .. } => "NOT_ANALYZED",
            CalcError::Solver(_) => "SOLVER_ERROR",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("span_ft", "-5.0", "Span must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::shape_not_found("W99X1").error_code(), "SHAPE_NOT_FOUND");
        assert_eq!(
            CalcError::unsupported("plastic_neutral_axis", "parallel deck").error_code(),
            "UNSUPPORTED"
        );
        assert_eq!(CalcError::not_analyzed("max_moment").error_code(), "NOT_ANALYZED");
        assert_eq!(CalcError::from(FeaError::SingularMatrix).error_code(), "SOLVER_ERROR");
    }

    #[test]
    fn test_solver_error_is_passed_through() {
        let inner = FeaError::Unstable("no supports".to_string());
        let wrapped = CalcError::from(inner.clone());
        assert_eq!(wrapped.to_string(), inner.to_string());
        assert_eq!(wrapped, CalcError::Solver(inner));
    }

    #[test]
    fn test_not_analyzed_message_names_query() {
        let err = CalcError::not_analyzed("max_moment");
        assert!(err.to_string().contains("max_moment"));
        assert!(err.to_string().contains("analyze()"));
    }
}
