//! # Error Types
//!
//! Domain-specific error types for vet-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vet-core errors (this file)                                           │
//! │  ├── CoreError        - Domain precondition failures                   │
//! │  └── ValidationError  - Form-level input rules                         │
//! │                                                                         │
//! │  vet-db errors (separate crate)                                        │
//! │  └── DbError          - Storage failures, wraps the above              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → presentation layer      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Not-found is never an error here: lookups return `Option`/empty lists.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An update was requested for a record that was never stored.
    ///
    /// ## When This Occurs
    /// - `update` called with `id: None`
    ///
    /// Raised before any storage access.
    #[error("{entity} ID is required for update")]
    MissingId { entity: &'static str },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used by operation and directory forms before a record is saved.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A field is required for a specific operation type.
    #[error("{field} is required for {operation}")]
    RequiredFor { field: String, operation: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Range start lies after its end.
    #[error("{start_field} must not be after {end_field}")]
    InvertedRange {
        start_field: String,
        end_field: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_id_message() {
        let err = CoreError::MissingId { entity: "Animal" };
        assert_eq!(err.to_string(), "Animal ID is required for update");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::RequiredFor {
            field: "bull".to_string(),
            operation: "Осеменение".to_string(),
        };
        assert_eq!(err.to_string(), "bull is required for Осеменение");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "number".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
