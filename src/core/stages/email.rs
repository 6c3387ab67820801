use super::field_mentions;
use crate::core::stats::{is_truthy, value_as_text};
use crate::domain::model::Record;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub fn is_valid_email(text: &str) -> bool {
    EMAIL_RE.is_match(text)
}

/// Counts set values in email fields that do not look like an address.
/// Records are only inspected, never changed.
pub fn count_invalid_emails(records: &[Record]) -> usize {
    records
        .iter()
        .flat_map(|record| record.data.iter())
        .filter(|(field, value)| field_mentions(field, "email") && is_truthy(Some(*value)))
        .filter(|(_, value)| !is_valid_email(&value_as_text(value)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect()
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("X@Y.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("bad-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email(" a@b.com"));
    }

    #[test]
    fn test_counts_invalid_values_in_email_fields_only() {
        let input = records(vec![
            json!({"Email": "X@Y.com", "note": "bad-email"}),
            json!({"Email": "bad-email"}),
            json!({"work_email": "also bad"}),
        ]);

        assert_eq!(count_invalid_emails(&input), 2);
    }

    #[test]
    fn test_empty_and_null_values_are_skipped() {
        let input = records(vec![json!({"email": ""}), json!({"email": null}), json!({})]);
        assert_eq!(count_invalid_emails(&input), 0);
    }

    #[test]
    fn test_records_are_not_modified() {
        let input = records(vec![json!({"email": "bad-email"})]);
        let before = input.clone();
        count_invalid_emails(&input);
        assert_eq!(input, before);
    }
}
