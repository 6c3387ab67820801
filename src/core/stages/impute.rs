use crate::core::stats::{is_missing, is_mostly_numeric, most_common, number_value, parse_number, upper_median};
use crate::domain::model::Record;
use indexmap::IndexMap;
use serde_json::Value;

/// Fill value for one field, derived from the records as they were before
/// imputation started.
fn fill_value(records: &[Record], field: &str) -> Option<Value> {
    let present: Vec<&Value> = records
        .iter()
        .filter_map(|record| record.get(field))
        .filter(|value| !is_missing(Some(*value)))
        .collect();

    if present.is_empty() {
        return None;
    }

    let numbers: Vec<f64> = present.iter().filter_map(|v| parse_number(v)).collect();
    if is_mostly_numeric(numbers.len(), present.len()) {
        upper_median(numbers).map(number_value)
    } else {
        most_common(present.iter().copied()).cloned()
    }
}

/// Replaces missing values with the field's median (numeric fields) or most
/// frequent value (text fields). Returns the new records and the number of
/// values replaced.
///
/// Only fields a record actually carries are touched; absent keys are not
/// added. Fields with no usable value anywhere are left as they are.
pub fn fill_missing(records: &[Record]) -> (Vec<Record>, usize) {
    let mut fills: IndexMap<&str, Option<Value>> = IndexMap::new();
    for record in records {
        for field in record.fields() {
            if !fills.contains_key(field.as_str()) {
                fills.insert(field.as_str(), fill_value(records, field));
            }
        }
    }

    for (field, fill) in &fills {
        match fill {
            Some(value) => tracing::debug!("Fill value for '{}': {}", field, value),
            None => tracing::debug!("No usable values for '{}', leaving gaps", field),
        }
    }

    let mut fixed = 0;
    let filled = records
        .iter()
        .map(|record| {
            let mut data = record.data.clone();
            for (field, value) in data.iter_mut() {
                if !is_missing(Some(&*value)) {
                    continue;
                }
                if let Some(Some(fill)) = fills.get(field.as_str()) {
                    *value = fill.clone();
                    fixed += 1;
                }
            }
            Record::new(data)
        })
        .collect();

    (filled, fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stats::MISSING_TOKENS;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect()
    }

    #[test]
    fn test_numeric_field_uses_upper_median() {
        let input = records(vec![
            json!({"age": 1}),
            json!({"age": "2"}),
            json!({"age": 3}),
            json!({"age": 4}),
            json!({"age": null}),
        ]);

        let (output, fixed) = fill_missing(&input);

        assert_eq!(fixed, 1);
        assert_eq!(output[4].data["age"], json!(3));
        // untouched values keep their original representation
        assert_eq!(output[1].data["age"], json!("2"));
    }

    #[test]
    fn test_text_field_uses_most_common_value() {
        let input = records(vec![
            json!({"city": "a"}),
            json!({"city": "a"}),
            json!({"city": "b"}),
            json!({"city": "N/A"}),
        ]);

        let (output, fixed) = fill_missing(&input);

        assert_eq!(fixed, 1);
        assert_eq!(output[3].data["city"], json!("a"));
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen_value() {
        let input = records(vec![
            json!({"c": "x"}),
            json!({"c": "y"}),
            json!({"c": "y"}),
            json!({"c": "x"}),
            json!({"c": ""}),
        ]);

        let (output, _) = fill_missing(&input);

        assert_eq!(output[4].data["c"], json!("x"));
    }

    #[test]
    fn test_all_sentinels_are_replaced() {
        let input = records(vec![
            json!({"n": 10, "t": "keep"}),
            json!({"n": "N/A", "t": "null"}),
            json!({"n": "undefined", "t": ""}),
            json!({"n": null, "t": null}),
        ]);

        let (output, fixed) = fill_missing(&input);

        assert_eq!(fixed, 6);
        for record in &output {
            for value in record.data.values() {
                assert!(!is_missing(Some(value)));
                if let Some(s) = value.as_str() {
                    assert!(!MISSING_TOKENS.contains(&s));
                }
            }
        }
    }

    #[test]
    fn test_field_without_values_is_left_alone() {
        let input = records(vec![json!({"x": null, "y": 1}), json!({"x": "N/A", "y": 2})]);

        let (output, fixed) = fill_missing(&input);

        assert_eq!(fixed, 0);
        assert_eq!(output[0].data["x"], json!(null));
        assert_eq!(output[1].data["x"], json!("N/A"));
    }

    #[test]
    fn test_fill_is_computed_from_pre_stage_snapshot() {
        // a fixed row must not influence the fill of later rows
        let input = records(vec![
            json!({"v": "b"}),
            json!({"v": null}),
            json!({"v": null}),
            json!({"v": "a"}),
            json!({"v": "a"}),
        ]);

        let (output, fixed) = fill_missing(&input);

        assert_eq!(fixed, 2);
        assert_eq!(output[1].data["v"], json!("a"));
        assert_eq!(output[2].data["v"], json!("a"));
    }

    #[test]
    fn test_absent_fields_are_not_inserted() {
        let input = records(vec![json!({"a": 1, "b": "x"}), json!({"a": 2})]);

        let (output, fixed) = fill_missing(&input);

        assert_eq!(fixed, 0);
        assert!(!output[1].data.contains_key("b"));
    }

    #[test]
    fn test_mixed_field_below_threshold_is_textual() {
        let input = records(vec![
            json!({"code": "1"}),
            json!({"code": "A"}),
            json!({"code": "A"}),
            json!({"code": "2"}),
            json!({"code": null}),
        ]);

        let (output, _) = fill_missing(&input);

        // exactly half numeric is not a majority
        assert_eq!(output[4].data["code"], json!("A"));
    }
}
