//! Directory service errors

use thiserror::Error;

use crate::fields::{ErrorKind, ValidationError};
use crate::storage::StorageError;

/// Failure of a directory operation.
///
/// Validation failures are recoverable and nothing was written. Storage
/// failures are surfaced as-is and end the session.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DirectoryError {
    /// The validation kind, if this is a validation failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            DirectoryError::Validation(e) => Some(e.kind()),
            DirectoryError::Storage(_) => None,
        }
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            DirectoryError::Validation(e) => e.code(),
            DirectoryError::Storage(e) => e.code().code(),
        }
    }
}

/// Result type for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;
