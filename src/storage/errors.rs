//! Storage error types
//!
//! Error codes:
//! - CONTACTDIR_STORAGE_IO_ERROR (ERROR severity)
//! - CONTACTDIR_STORAGE_WRITE_FAILED (ERROR severity)
//! - CONTACTDIR_STORAGE_READ_FAILED (ERROR severity)
//! - CONTACTDIR_DATA_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, may be retried
    Error,
    /// The store cannot be trusted; the process must stop
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Disk I/O failure
    StorageIoError,
    /// Record write failed
    StorageWriteFailed,
    /// Record read failed
    StorageReadFailed,
    /// Checksum failure or truncated log
    DataCorruption,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::StorageIoError => "CONTACTDIR_STORAGE_IO_ERROR",
            StorageErrorCode::StorageWriteFailed => "CONTACTDIR_STORAGE_WRITE_FAILED",
            StorageErrorCode::StorageReadFailed => "CONTACTDIR_STORAGE_READ_FAILED",
            StorageErrorCode::DataCorruption => "CONTACTDIR_DATA_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::DataCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with code, message and optional context
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StorageError {
    /// Create a new storage I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::StorageIoError,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new write failed error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::StorageWriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a write failed error without IO source
    pub fn write_failed_no_source(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::StorageWriteFailed,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a new read failed error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::StorageReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a data corruption error with byte offset context (FATAL)
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::DataCorruption,
            message: reason.into(),
            details: Some(format!("byte_offset: {}", offset)),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_corruption_is_fatal() {
        assert_eq!(StorageErrorCode::DataCorruption.severity(), Severity::Fatal);
        assert_eq!(StorageErrorCode::StorageIoError.severity(), Severity::Error);
        assert_eq!(StorageErrorCode::StorageWriteFailed.severity(), Severity::Error);
        assert_eq!(StorageErrorCode::StorageReadFailed.severity(), Severity::Error);
    }

    #[test]
    fn test_write_failed_not_fatal() {
        let err = StorageError::write_failed("disk full", io::Error::other("disk full"));
        assert!(!err.is_fatal());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display_contains_code_and_offset() {
        let err = StorageError::corruption_at_offset(1024, "checksum mismatch");
        let display = err.to_string();
        assert!(display.contains("CONTACTDIR_DATA_CORRUPTION"));
        assert!(display.contains("FATAL"));
        assert!(display.contains("checksum mismatch"));
        assert!(display.contains("byte_offset: 1024"));
    }
}
