//! Custom error types for benefit-vault
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Input validation errors (short password, mismatched confirmation),
    /// always raised before any crypto work starts
    #[error("Validation error: {0}")]
    Validation(String),

    /// An export package missing its salt or ciphertext, or otherwise
    /// not matching the expected container shape
    #[error("Malformed package: {0}")]
    MalformedPackage(String),

    /// Authentication failure on decrypt. Wrong password and tampered
    /// ciphertext are deliberately indistinguishable here.
    #[error("invalid password or corrupted file")]
    Decryption,

    /// The envelope decrypted fine but declares a version this build
    /// does not support
    #[error("unsupported file version: {0}")]
    UnsupportedVersion(String),

    /// Record not found in the vault
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Underlying persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Caller-initiated abort of an in-flight operation; not a failure
    #[error("operation cancelled")]
    Cancelled,
}

impl VaultError {
    /// Create a "not found" error for saved result records
    pub fn record_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Record",
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

    /// Check if this is a caller-initiated cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for vault operations
pub type VaultResult<T> = Result<T, VaultError>;
