use crate::core::stats::number_value;
use crate::domain::model::Record;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt::Write;

fn write_object(key: &mut String, map: &Map<String, Value>) {
    key.push('{');
    for (i, (field, value)) in map.iter().enumerate() {
        if i > 0 {
            key.push(',');
        }
        // Debug quoting escapes `"` and `\`, so distinct names stay distinct.
        let _ = write!(key, "{:?}:", field);
        write_value(key, value);
    }
    key.push('}');
}

fn write_value(key: &mut String, value: &Value) {
    match value {
        // 1.0 and 1 are the same number
        Value::Number(n) if n.is_f64() => {
            let normalized = n.as_f64().map(number_value).unwrap_or(Value::Null);
            let _ = write!(key, "{}", normalized);
        }
        Value::Array(items) => {
            key.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    key.push(',');
                }
                write_value(key, item);
            }
            key.push(']');
        }
        Value::Object(map) => write_object(key, map),
        other => {
            let _ = write!(key, "{}", other);
        }
    }
}

/// Identity of a record: its fields in stored order, so `{a, b}` and `{b, a}`
/// with the same values are different records.
fn canonical_key(record: &Record) -> String {
    let mut key = String::new();
    write_object(&mut key, &record.data);
    key
}

/// Keeps the first occurrence of every distinct record. Returns the kept
/// records and how many were dropped.
pub fn remove_duplicates(records: &[Record]) -> (Vec<Record>, usize) {
    let mut seen = HashSet::with_capacity(records.len());
    let unique: Vec<Record> = records
        .iter()
        .filter(|record| seen.insert(canonical_key(record)))
        .cloned()
        .collect();

    let removed = records.len() - unique.len();
    (unique, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_keeps_first_occurrence_in_order() {
        let records = vec![
            record(json!({"id": 1, "name": "a"})),
            record(json!({"id": 2, "name": "b"})),
            record(json!({"id": 1, "name": "a"})),
            record(json!({"id": 3, "name": "c"})),
            record(json!({"id": 2, "name": "b"})),
        ];

        let (unique, removed) = remove_duplicates(&records);

        assert_eq!(removed, 2);
        let ids: Vec<i64> = unique.iter().map(|r| r.data["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_field_order_is_part_of_identity() {
        let records = vec![
            record(json!({"a": 1, "b": 2})),
            record(json!({"b": 2, "a": 1})),
        ];

        let (unique, removed) = remove_duplicates(&records);

        assert_eq!(removed, 0);
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_number_and_string_are_distinct() {
        let records = vec![record(json!({"a": 1})), record(json!({"a": "1"}))];
        let (_, removed) = remove_duplicates(&records);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_integral_float_equals_integer() {
        let records = vec![
            record(json!({"a": 1, "tags": [2, {"w": 3}]})),
            record(json!({"a": 1.0, "tags": [2.0, {"w": 3.0}]})),
            record(json!({"a": 1.5})),
        ];

        let (unique, removed) = remove_duplicates(&records);

        assert_eq!(removed, 1);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].data["a"], json!(1));
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            record(json!({"x": "1"})),
            record(json!({"x": "1"})),
            record(json!({"x": "2"})),
        ];

        let (once, _) = remove_duplicates(&records);
        let (twice, removed_again) = remove_duplicates(&once);

        assert_eq!(once, twice);
        assert_eq!(removed_again, 0);
    }

    #[test]
    fn test_empty_input() {
        let (unique, removed) = remove_duplicates(&[]);
        assert!(unique.is_empty());
        assert_eq!(removed, 0);
    }
}
