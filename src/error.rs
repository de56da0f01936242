//! Custom error types for the FAQ store
//!
//! This module defines the error hierarchy for the store using thiserror.
//! The layer-specific enums (`DecodeError`, `WriteError`, `RestoreError`)
//! are wrapped unchanged by `FaqStoreError` so callers can always tell a
//! data-integrity failure apart from a client mistake.

use thiserror::Error;

/// Failure to turn stored bytes back into a FAQ document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input is not a well-formed document (bad JSON, wrong shape or types)
    #[error("malformed document: {0}")]
    Malformed(String),

    /// Well-formed, but an entry breaks the FAQ entry invariants
    #[error("schema violation: {0}")]
    SchemaViolation(String),
}

/// Failure to durably persist a document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// The storage medium rejected the write; prior content is untouched
    #[error("failed to persist {path}: {reason}")]
    Persist { path: String, reason: String },
}

/// Failure to restore a backup artifact into a live environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RestoreError {
    /// The artifact does not decode as a valid document
    #[error("backup {filename} is invalid: {source}")]
    Invalid {
        filename: String,
        #[source]
        source: DecodeError,
    },

    /// The artifact belongs to another environment
    #[error("backup belongs to environment '{artifact}', cannot restore into '{target}'")]
    EnvironmentMismatch { artifact: String, target: String },
}

/// The main error type for FAQ store operations
#[derive(Error, Debug)]
pub enum FaqStoreError {
    /// Stored document could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Document could not be persisted
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Backup restore was rejected
    #[error(transparent)]
    Restore(#[from] RestoreError),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The environment's write gate could not be acquired in time
    #[error("environment '{environment}' is busy: write lock not acquired within {waited_ms}ms")]
    Busy { environment: String, waited_ms: u64 },

    /// Client-supplied entry data is invalid
    #[error("Validation error: {0}")]
    Validation(String),

    /// Environment name is not one of the configured environments
    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors outside the atomic write path
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization errors outside the document codec
    #[error("JSON error: {0}")]
    Json(String),
}

impl FaqStoreError {
    /// Create a "not found" error for FAQ entries
    pub fn faq_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "FAQ",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backup artifacts
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
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

    /// Check if this error means stored data failed integrity checks
    ///
    /// Operators should treat these as data problems, not client mistakes.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::Decode(_)
                | Self::Restore(RestoreError::Invalid { .. })
        )
    }

    /// Check if this is a lock timeout
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}

impl From<std::io::Error> for FaqStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FaqStoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for FAQ store operations
pub type FaqStoreResult<T> = Result<T, FaqStoreError>;
