//! Custom error types for smb-shares
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for share and backup operations
#[derive(Error, Debug)]
pub enum SharesError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// One or more share fields failed validation
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A share path (or one of its components) does not exist
    #[error("Path does not exist: {0}")]
    PathNotFound(String),

    /// A share path resolves outside the allowed root
    #[error("Path {} resolves outside of {}", path.display(), root.display())]
    PathEscape { path: PathBuf, root: PathBuf },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Backup errors
    #[error("Backup error: {0}")]
    Backup(String),
}

impl SharesError {
    /// Create a "not found" error for shares
    pub fn share_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Share",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::PathNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error was raised by the path containment check
    pub fn is_security(&self) -> bool {
        matches!(self, Self::PathEscape { .. })
    }
}

impl From<std::io::Error> for SharesError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SharesError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for smb-shares operations
pub type SharesResult<T> = Result<T, SharesError>;
