//! Validation error types
//!
//! Every variant is recoverable: the caller reports the message and carries on.
//! Storage failures are not validation errors and live in `storage::StorageError`.

use std::fmt;

use thiserror::Error;

use super::rules::Field;

/// Coarse error kinds callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Create without one or more required fields
    MissingFields,
    /// Field present but failing its pattern
    InvalidFormat,
    /// Token names a field a contact does not have
    UnknownField,
    /// Update without an id
    MissingId,
    /// Id or page number that is not an integer
    NonIntegerId,
    /// Update target absent from the store
    RecordNotFound,
    /// Input line that does not fit the mode's grammar
    MalformedInput,
}

impl ErrorKind {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingFields => "CONTACTDIR_MISSING_FIELDS",
            ErrorKind::InvalidFormat => "CONTACTDIR_INVALID_FORMAT",
            ErrorKind::UnknownField => "CONTACTDIR_UNKNOWN_FIELD",
            ErrorKind::MissingId => "CONTACTDIR_MISSING_ID",
            ErrorKind::NonIntegerId => "CONTACTDIR_NON_INTEGER_ID",
            ErrorKind::RecordNotFound => "CONTACTDIR_RECORD_NOT_FOUND",
            ErrorKind::MalformedInput => "CONTACTDIR_MALFORMED_INPUT",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Validation failure raised before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Expected fields: {}", join_fields(.0))]
    MissingFields(Vec<Field>),

    #[error("Incorrect {field} format: {value}. Expected format: {hint}")]
    InvalidFormat {
        field: Field,
        value: String,
        hint: &'static str,
    },

    #[error("Unknown field {0}")]
    UnknownField(String),

    #[error("Expected id field")]
    MissingId,

    #[error("id should be integer")]
    NonIntegerId(String),

    #[error("Incorrect page number format. Expected number")]
    InvalidPageNumber(String),

    #[error("Record with id {0} not found")]
    RecordNotFound(i64),

    #[error("Incorrect number of fields. Expected {expected}")]
    FieldCount { expected: usize, actual: usize },

    #[error("Incorrect token {0}. Expected <field>=<value>")]
    MalformedToken(String),
}

impl ValidationError {
    /// Returns the kind callers branch on
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::MissingFields(_) => ErrorKind::MissingFields,
            ValidationError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            ValidationError::UnknownField(_) => ErrorKind::UnknownField,
            ValidationError::MissingId => ErrorKind::MissingId,
            ValidationError::NonIntegerId(_) | ValidationError::InvalidPageNumber(_) => {
                ErrorKind::NonIntegerId
            }
            ValidationError::RecordNotFound(_) => ErrorKind::RecordNotFound,
            ValidationError::FieldCount { .. } | ValidationError::MalformedToken(_) => {
                ErrorKind::MalformedInput
            }
        }
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Builds an invalid format error from the field's rule
    pub fn invalid_format(field: Field, value: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field,
            value: value.into(),
            hint: field.rule().hint(),
        }
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;
