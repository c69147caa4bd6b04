//! Line grammars for the menu modes
//!
//! - add: six positional tokens in field order
//! - update: leading bare id token, then `field=value` tokens
//! - find: `field=value` tokens only

use crate::directory::ID_KEY;
use crate::fields::{Field, RawFields, ValidationError, ValidationResult};

/// Parses `<name> <second_name> <middle_name> <organisation> <org_phone> <personal_phone>`.
pub fn parse_add_line(line: &str) -> ValidationResult<RawFields> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != Field::ALL.len() {
        return Err(ValidationError::FieldCount {
            expected: Field::ALL.len(),
            actual: tokens.len(),
        });
    }

    Ok(Field::ALL
        .into_iter()
        .zip(tokens)
        .map(|(field, value)| (field.as_str().to_string(), value.to_string()))
        .collect())
}

/// Parses `<id> field=value ...`.
///
/// A first token containing `=` means no id was given; the service then
/// reports the missing id. A bare id must be an integer and is checked
/// before any field token.
pub fn parse_update_line(line: &str) -> ValidationResult<RawFields> {
    let mut tokens = line.split_whitespace().peekable();

    let id = tokens.next_if(|token| !token.contains('='));
    if let Some(id) = id {
        id.parse::<i64>()
            .map_err(|_| ValidationError::NonIntegerId(id.to_string()))?;
    }
    let mut fields = parse_assignments(tokens)?;
    if let Some(id) = id {
        fields.insert(ID_KEY.to_string(), id.to_string());
    }

    Ok(fields)
}

/// Parses `field=value ...`. An empty line means no filters.
pub fn parse_find_line(line: &str) -> ValidationResult<RawFields> {
    parse_assignments(line.split_whitespace())
}

fn parse_assignments<'a>(tokens: impl Iterator<Item = &'a str>) -> ValidationResult<RawFields> {
    let mut fields = RawFields::new();

    for token in tokens {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| ValidationError::MalformedToken(token.to_string()))?;
        let field = key.parse::<Field>()?;
        fields.insert(field.as_str().to_string(), value.to_string());
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_line_maps_positions_to_fields() {
        let fields =
            parse_add_line("Vasya Pupkin Ivanovich Gazprom 12345 89214444444").unwrap();
        assert_eq!(fields["name"], "Vasya");
        assert_eq!(fields["second_name"], "Pupkin");
        assert_eq!(fields["middle_name"], "Ivanovich");
        assert_eq!(fields["organisation"], "Gazprom");
        assert_eq!(fields["org_phone"], "12345");
        assert_eq!(fields["personal_phone"], "89214444444");
    }

    #[test]
    fn test_add_line_requires_six_tokens() {
        let err = parse_add_line("Vasya Pupkin").unwrap_err();
        assert_eq!(err, ValidationError::FieldCount { expected: 6, actual: 2 });
        assert_eq!(err.to_string(), "Incorrect number of fields. Expected 6");
    }

    #[test]
    fn test_update_line_with_id() {
        let fields = parse_update_line("1 organisation=Gazprom personal_phone=+79214444444").unwrap();
        assert_eq!(fields["id"], "1");
        assert_eq!(fields["organisation"], "Gazprom");
        assert_eq!(fields["personal_phone"], "+79214444444");
    }

    #[test]
    fn test_update_line_without_id() {
        let fields = parse_update_line("organisation=Gazprom").unwrap();
        assert!(!fields.contains_key("id"));
    }

    #[test]
    fn test_update_line_rejects_non_integer_id_first() {
        let err = parse_update_line("abc nickname=x").unwrap_err();
        assert_eq!(err, ValidationError::NonIntegerId("abc".into()));

        let err = parse_update_line("1 nickname=x").unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("nickname".into()));
    }

    #[test]
    fn test_id_assignment_is_unknown_field() {
        let err = parse_find_line("id=3").unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("id".into()));
        let err = parse_update_line("1 id=3").unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("id".into()));
    }

    #[test]
    fn test_find_line() {
        assert!(parse_find_line("   ").unwrap().is_empty());
        let fields = parse_find_line("name=Bob organisation=Gazprom").unwrap();
        assert_eq!(fields.len(), 2);
        assert!(matches!(
            parse_find_line("name"),
            Err(ValidationError::MalformedToken(_))
        ));
        assert!(matches!(
            parse_find_line("nickname=bob"),
            Err(ValidationError::UnknownField(_))
        ));
    }
}
