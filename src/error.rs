//! Error types for the snippet store and its storage backends.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{SnippetId, ValidationError};

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to read or write a slot file.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode the collection.
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    /// Create an IO error with the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors returned by store and selection operations. None of them is fatal;
/// on every error path the collection is left untouched.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("snippet not found: {0}")]
    NotFound(SnippetId),

    #[error("could not generate a unique snippet id after {attempts} attempts")]
    IdCollision { attempts: usize },

    #[error("failed to persist snippets: {0}")]
    Persistence(#[from] StorageError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
