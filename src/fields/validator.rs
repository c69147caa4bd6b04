//! Record validator
//!
//! Validation semantics:
//! - Create requires all six mutable fields
//! - Update and filter accept any subset
//! - Every present field must satisfy its rule
//!
//! The validator never mutates its input and is deterministic: fields are
//! checked in positional order, so the first offending field is always the
//! one reported.

use super::errors::{ValidationError, ValidationResult};
use super::rules::Field;
use super::{FieldMap, RawFields};

/// The context a field map is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// New record: every field required
    Create,
    /// Partial update: any subset
    Update,
    /// Search filter: any subset
    Filter,
}

impl ValidationMode {
    fn requires_all_fields(&self) -> bool {
        matches!(self, ValidationMode::Create)
    }
}

/// Converts string keys into fields, rejecting names a contact does not have.
pub fn parse_fields(raw: &RawFields) -> ValidationResult<FieldMap> {
    raw.iter()
        .map(|(key, value)| -> ValidationResult<(Field, String)> {
            Ok((key.parse::<Field>()?, value.clone()))
        })
        .collect()
}

/// Validates `fields` for the given mode.
///
/// # Errors
///
/// - `MissingFields` if `mode` is `Create` and any field is absent
/// - `InvalidFormat` for the first present field failing its pattern
pub fn validate(fields: &FieldMap, mode: ValidationMode) -> ValidationResult<()> {
    if mode.requires_all_fields() {
        check_presence(fields)?;
    }

    for (field, value) in fields {
        if !field.rule().matches(value) {
            return Err(ValidationError::invalid_format(*field, value.as_str()));
        }
    }

    Ok(())
}

/// Shorthand for `validate(fields, ValidationMode::Create)`.
pub fn validate_for_create(fields: &FieldMap) -> ValidationResult<()> {
    validate(fields, ValidationMode::Create)
}

pub(crate) fn check_presence(fields: &FieldMap) -> ValidationResult<()> {
    let missing: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|field| !fields.contains_key(field))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}
