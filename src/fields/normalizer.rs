//! Field normalizer
//!
//! Applied after validation, never before. Every normalization is idempotent.

use super::rules::{Field, Normalization};
use super::FieldMap;

/// Canonicalizes every present field.
pub fn normalize(fields: FieldMap) -> FieldMap {
    fields
        .into_iter()
        .map(|(field, value)| {
            let value = normalize_value(field, &value);
            (field, value)
        })
        .collect()
}

/// Canonicalizes a single value according to its field's rule.
pub fn normalize_value(field: Field, value: &str) -> String {
    match field.rule().normalization() {
        Normalization::Capitalize => capitalize(value.trim()),
        Normalization::PersonalPhone => rewrite_phone_prefix(value.trim()),
        Normalization::Verbatim => value.to_string(),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// 8XXXXXXXXXX -> +7XXXXXXXXXX; anything else is left alone.
fn rewrite_phone_prefix(phone: &str) -> String {
    match phone.strip_prefix('8') {
        Some(rest) if phone.chars().count() == 11 => format!("+7{rest}"),
        _ => phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed_and_capitalized() {
        assert_eq!(normalize_value(Field::Name, "  bob"), "Bob");
        assert_eq!(normalize_value(Field::SecondName, "pUPKIN "), "Pupkin");
        assert_eq!(normalize_value(Field::Organisation, "ГАЗПРОМ"), "Газпром");
    }

    #[test]
    fn test_personal_phone_prefix_rewrite() {
        assert_eq!(
            normalize_value(Field::PersonalPhone, "89101459029"),
            "+79101459029"
        );
        assert_eq!(
            normalize_value(Field::PersonalPhone, "+79101459029"),
            "+79101459029"
        );
        assert_eq!(
            normalize_value(Field::PersonalPhone, " 89101459029 "),
            "+79101459029"
        );
    }

    #[test]
    fn test_personal_phone_wrong_shape_is_untouched() {
        assert_eq!(normalize_value(Field::PersonalPhone, "8910145902"), "8910145902");
        assert_eq!(normalize_value(Field::PersonalPhone, "79101459029"), "79101459029");
    }

    #[test]
    fn test_org_phone_is_verbatim() {
        assert_eq!(normalize_value(Field::OrgPhone, "07424"), "07424");
    }

    #[test]
    fn test_normalize_touches_only_present_fields() {
        let fields = FieldMap::from([(Field::Name, "alice".to_string())]);
        let normalized = normalize(fields);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[&Field::Name], "Alice");
    }
}
