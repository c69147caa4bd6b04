//! Contact record types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fields::{check_presence, Field, FieldMap, ValidationError, ValidationResult};

/// Store-assigned contact identity. Always positive.
pub type ContactId = u64;

/// The six mutable fields of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub second_name: String,
    pub middle_name: String,
    pub organisation: String,
    pub org_phone: String,
    pub personal_phone: String,
}

impl ContactFields {
    /// Returns the value of one field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::SecondName => &self.second_name,
            Field::MiddleName => &self.middle_name,
            Field::Organisation => &self.organisation,
            Field::OrgPhone => &self.org_phone,
            Field::PersonalPhone => &self.personal_phone,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::SecondName => &mut self.second_name,
            Field::MiddleName => &mut self.middle_name,
            Field::Organisation => &mut self.organisation,
            Field::OrgPhone => &mut self.org_phone,
            Field::PersonalPhone => &mut self.personal_phone,
        }
    }

    /// Overwrites only the fields present in `patch`.
    pub fn apply(&mut self, patch: &FieldMap) {
        for (field, value) in patch {
            *self.slot(*field) = value.clone();
        }
    }

    /// Equality-AND over every field in `filter`. An empty filter matches.
    pub fn matches(&self, filter: &FieldMap) -> bool {
        filter
            .iter()
            .all(|(field, value)| self.get(*field) == value.as_str())
    }
}

impl<'a> TryFrom<&'a FieldMap> for ContactFields {
    type Error = ValidationError;

    fn try_from(fields: &'a FieldMap) -> ValidationResult<Self> {
        check_presence(fields)?;

        let take = |field: Field| fields[&field].clone();
        Ok(Self {
            name: take(Field::Name),
            second_name: take(Field::SecondName),
            middle_name: take(Field::MiddleName),
            organisation: take(Field::Organisation),
            org_phone: take(Field::OrgPhone),
            personal_phone: take(Field::PersonalPhone),
        })
    }
}

/// A persisted contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    #[serde(flatten)]
    pub fields: ContactFields,
}

impl Contact {
    pub fn new(id: ContactId, fields: ContactFields) -> Self {
        Self { id, fields }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.fields;
        writeln!(f, "id: {}", self.id)?;
        writeln!(f, "organisation: {}", c.organisation)?;
        writeln!(f, "name: {} {} {}", c.name, c.middle_name, c.second_name)?;
        writeln!(f, "organisation phone number: {}", c.org_phone)?;
        writeln!(f, "personal phone number: {}", c.personal_phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContactFields {
        ContactFields {
            name: "Vasya".into(),
            second_name: "Pupkin".into(),
            middle_name: "Ivanovich".into(),
            organisation: "Gazprom".into(),
            org_phone: "12345".into(),
            personal_phone: "+79214444444".into(),
        }
    }

    #[test]
    fn test_apply_changes_only_patched_fields() {
        let mut fields = sample();
        fields.apply(&FieldMap::from([(Field::Organisation, "Rosneft".to_string())]));
        assert_eq!(fields.organisation, "Rosneft");
        assert_eq!(fields.name, "Vasya");
        assert_eq!(fields.personal_phone, "+79214444444");
    }

    #[test]
    fn test_matches_is_equality_and() {
        let fields = sample();
        assert!(fields.matches(&FieldMap::new()));
        assert!(fields.matches(&FieldMap::from([
            (Field::Name, "Vasya".to_string()),
            (Field::Organisation, "Gazprom".to_string()),
        ])));
        assert!(!fields.matches(&FieldMap::from([
            (Field::Name, "Vasya".to_string()),
            (Field::Organisation, "Rosneft".to_string()),
        ])));
    }

    #[test]
    fn test_try_from_requires_every_field() {
        let err = ContactFields::try_from(&FieldMap::from([(Field::Name, "Vasya".to_string())]))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(Field::ALL[1..].to_vec())
        );
    }

    #[test]
    fn test_display_dump_layout() {
        let dump = Contact::new(7, sample()).to_string();
        assert_eq!(
            dump,
            "id: 7\n\
             organisation: Gazprom\n\
             name: Vasya Ivanovich Pupkin\n\
             organisation phone number: 12345\n\
             personal phone number: +79214444444\n"
        );
    }
}
