//! Custom error types for Bizdesk
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Bizdesk operations
#[derive(Error, Debug)]
pub enum BizdeskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for request data and models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors (unique names)
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Stale revision supplied on update or delete
    #[error("{entity_type} {identifier} was modified: expected revision {expected}, found {actual}")]
    Conflict {
        entity_type: &'static str,
        identifier: String,
        expected: u32,
        actual: u32,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BizdeskError {
    /// Create a "not found" error for businesses
    pub fn business_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Business",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error was caused by conflicting data (duplicate or stale write)
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Duplicate { .. } | Self::Conflict { .. })
    }
}

impl From<std::io::Error> for BizdeskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BizdeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Bizdesk operations
pub type BizdeskResult<T> = Result<T, BizdeskError>;
