//! Error types for store access and request rendering.

use crate::types::ContentRef;
use thiserror::Error;

/// Errors raised by object store and ancestry backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// The reference is unknown to the store
    #[error("Object not found: {0}")]
    NotFound(ContentRef),

    /// The reference is known but its content could not be read
    #[error("Object unreadable: {id}: {reason}")]
    Unreadable { id: ContentRef, reason: String },

    #[error("Invalid revision: {0}")]
    InvalidRevision(String),

    #[error("Object {id} is a {actual}, expected a {expected}")]
    WrongKind {
        id: ContentRef,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors surfaced by a tree-view request
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unresolvable revision, path, or object (rendered as a 404 page)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Metadata resolved but content could not be read (rendered as a 500 page)
    #[error("Internal error: {0}")]
    InternalError(String),

    /// The response sink rejected a write
    #[error("Output error: {0}")]
    OutputError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(StorageError),
}

impl ApiError {
    /// HTTP-style status for error pages; `None` when no page should be written.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::NotFound(_) => Some(404),
            ApiError::InternalError(_) | ApiError::StorageError(_) => Some(500),
            ApiError::OutputError(_) | ApiError::ConfigError(_) => None,
        }
    }

    /// Error page heading.
    pub fn title(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "Not found",
            _ => "Internal server error",
        }
    }

    /// Error page body text.
    pub fn message(&self) -> String {
        match self {
            ApiError::NotFound(msg) | ApiError::InternalError(msg) | ApiError::ConfigError(msg) => {
                msg.clone()
            }
            ApiError::StorageError(err) => err.to_string(),
            ApiError::OutputError(err) => err.to_string(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => ApiError::NotFound(format!("Bad object name: {}", id)),
            StorageError::InvalidRevision(rev) => {
                ApiError::NotFound(format!("Invalid revision name: {}", rev))
            }
            StorageError::WrongKind { id, expected, .. } => {
                ApiError::NotFound(format!("Not a {} object: {}", expected, id))
            }
            StorageError::Unreadable { id, .. } => {
                ApiError::InternalError(format!("Error reading object {}", id))
            }
            other => ApiError::StorageError(other),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
