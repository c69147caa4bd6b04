//! Field rule table
//!
//! One rule per mutable contact field. The validator and the normalizer both
//! consult this table; nothing else decides what a field may contain.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

/// Hint shown for every name-class field.
pub const TEXT_FORMAT_HINT: &str = "English or Russian letters";

/// Hint shown for the organisation phone.
pub const ORG_PHONE_FORMAT_HINT: &str = "5 digits. Example: 74244";

/// Hint shown for the personal phone.
pub const PERSONAL_PHONE_FORMAT_HINT: &str = "Phone number starts with +7 or 8 with continuation of 10 digits. Example: +79101459029 or 89101459029";

/// A single word of Latin letters or a single word of Cyrillic letters.
/// Surrounding whitespace is tolerated because the normalizer trims it.
static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[A-Za-z]+|[А-Яа-яЁё]+)\s*$").expect("Invalid name regex")
});

static ORG_PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}$").expect("Invalid org phone regex"));

static PERSONAL_PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:8|\+7)[0-9]{10}\s*$").expect("Invalid personal phone regex")
});

/// The six mutable fields of a contact record.
///
/// Declaration order is the positional order used by the add grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    SecondName,
    MiddleName,
    Organisation,
    OrgPhone,
    PersonalPhone,
}

impl Field {
    /// All mutable fields, in positional order.
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::SecondName,
        Field::MiddleName,
        Field::Organisation,
        Field::OrgPhone,
        Field::PersonalPhone,
    ];

    /// Returns the wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::SecondName => "second_name",
            Field::MiddleName => "middle_name",
            Field::Organisation => "organisation",
            Field::OrgPhone => "org_phone",
            Field::PersonalPhone => "personal_phone",
        }
    }

    /// Returns the rule governing this field.
    pub fn rule(&self) -> &'static FieldRule {
        match self {
            Field::Name | Field::SecondName | Field::MiddleName | Field::Organisation => {
                &NAME_RULE
            }
            Field::OrgPhone => &ORG_PHONE_RULE,
            Field::PersonalPhone => &PERSONAL_PHONE_RULE,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

/// How a field value is canonicalized before it reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Trim, then first character upper case and the rest lower case.
    Capitalize,
    /// Trim, then rewrite an 11-character `8…` number to `+7…`.
    PersonalPhone,
    /// Stored exactly as validated.
    Verbatim,
}

/// Validation pattern, format hint and normalization for one field.
pub struct FieldRule {
    pattern: &'static LazyLock<Regex>,
    hint: &'static str,
    normalization: Normalization,
}

impl FieldRule {
    /// Returns true if `value` satisfies the rule's pattern.
    pub fn matches(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }

    /// The pattern source, for diagnostics.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn hint(&self) -> &'static str {
        self.hint
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }
}

static NAME_RULE: FieldRule = FieldRule {
    pattern: &NAME_REGEX,
    hint: TEXT_FORMAT_HINT,
    normalization: Normalization::Capitalize,
};

static ORG_PHONE_RULE: FieldRule = FieldRule {
    pattern: &ORG_PHONE_REGEX,
    hint: ORG_PHONE_FORMAT_HINT,
    normalization: Normalization::Verbatim,
};

static PERSONAL_PHONE_RULE: FieldRule = FieldRule {
    pattern: &PERSONAL_PHONE_REGEX,
    hint: PERSONAL_PHONE_FORMAT_HINT,
    normalization: Normalization::PersonalPhone,
};

/// Looks up the pattern and hint for a field by its wire name.
pub fn lookup(field_name: &str) -> Option<(&'static str, &'static str)> {
    let field = field_name.parse::<Field>().ok()?;
    let rule = field.rule();
    Some((rule.pattern(), rule.hint()))
}
