//! Field rules, validation and normalization for contact records
//!
//! A contact has six mutable string fields. Each is governed by one
//! `FieldRule` (pattern, format hint, normalization). Input flows
//! raw map → `parse_fields` → `validate` → `normalize` before any store call.

mod errors;
mod normalizer;
mod rules;
mod validator;

use std::collections::BTreeMap;

pub use errors::{ErrorKind, ValidationError, ValidationResult};
pub use normalizer::{normalize, normalize_value};
pub use rules::{
    lookup, Field, FieldRule, Normalization, ORG_PHONE_FORMAT_HINT, PERSONAL_PHONE_FORMAT_HINT,
    TEXT_FORMAT_HINT,
};
pub(crate) use validator::check_presence;
pub use validator::{parse_fields, validate, validate_for_create, ValidationMode};

/// String-keyed field map as supplied by a caller.
pub type RawFields = BTreeMap<String, String>;

/// Typed field map; iteration follows positional field order.
pub type FieldMap = BTreeMap<Field, String>;
