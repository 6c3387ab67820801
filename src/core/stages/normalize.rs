use super::field_mentions;
use crate::domain::model::Record;
use serde_json::Value;

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut word: String = first.to_uppercase().collect();
    word.push_str(&chars.as_str().to_lowercase());
    word
}

/// "  nGUYen   văn a" -> "Nguyen Văn A"
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .filter(|word| !word.is_empty())
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_value(field: &str, text: &str) -> String {
    let mut normalized = text.trim().to_string();
    if field_mentions(field, "email") {
        normalized = normalized.to_lowercase();
    }
    if field_mentions(field, "name") {
        normalized = capitalize_words(&normalized);
    }
    normalized
}

/// Trims every string value, lowercases email fields and title-cases name
/// fields. Non-string values are copied unchanged.
pub fn normalize_text(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .map(|record| {
            let data = record
                .data
                .iter()
                .map(|(field, value)| {
                    let value = match value {
                        Value::String(s) => Value::String(normalize_value(field, s)),
                        other => other.clone(),
                    };
                    (field.clone(), value)
                })
                .collect();
            Record::new(data)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_name_fields_are_title_cased() {
        let input = vec![record(json!({"fullName": "  nGUYen văn A "}))];
        let output = normalize_text(&input);
        assert_eq!(output[0].data["fullName"], json!("Nguyen Văn A"));
    }

    #[test]
    fn test_email_fields_are_trimmed_and_lowercased() {
        let input = vec![record(json!({"Email": "  John.DOE@Example.COM "}))];
        let output = normalize_text(&input);
        assert_eq!(output[0].data["Email"], json!("john.doe@example.com"));
    }

    #[test]
    fn test_field_matching_both_rules_applies_both() {
        let input = vec![record(json!({"emailName": " ALICE@x.io "}))];
        let output = normalize_text(&input);
        assert_eq!(output[0].data["emailName"], json!("Alice@x.io"));
    }

    #[test]
    fn test_inner_spacing_collapses_in_name_fields() {
        assert_eq!(capitalize_words("anne   marie"), "Anne Marie");
        assert_eq!(capitalize_words(""), "");
    }

    #[test]
    fn test_other_strings_only_trimmed_and_non_strings_untouched() {
        let input = vec![record(json!({"city": "  HaNoi ", "age": 30, "note": null}))];
        let output = normalize_text(&input);
        assert_eq!(output[0].data["city"], json!("HaNoi"));
        assert_eq!(output[0].data["age"], json!(30));
        assert_eq!(output[0].data["note"], json!(null));
    }

    #[test]
    fn test_field_order_is_preserved() {
        let input = vec![record(json!({"z": " 1 ", "a": " 2 "}))];
        let output = normalize_text(&input);
        let fields: Vec<&String> = output[0].fields().collect();
        assert_eq!(fields, vec!["z", "a"]);
    }
}
