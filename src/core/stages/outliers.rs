use crate::core::stats::{iqr_bounds, is_mostly_numeric, parse_number};
use crate::domain::model::Record;

/// Fields of the first record whose values are numeric in more than half of
/// all records. Records lacking the field count against it.
fn numeric_fields(records: &[Record]) -> Vec<String> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    first
        .fields()
        .filter(|field| {
            let numeric = records
                .iter()
                .filter(|record| record.get(field).and_then(parse_number).is_some())
                .count();
            is_mostly_numeric(numeric, records.len())
        })
        .cloned()
        .collect()
}

fn filter_field(records: Vec<Record>, field: &str) -> Vec<Record> {
    let mut values: Vec<f64> = records
        .iter()
        .filter_map(|record| record.get(field).and_then(parse_number))
        .collect();
    values.sort_by(f64::total_cmp);

    let Some((lower, upper)) = iqr_bounds(&values) else {
        tracing::debug!("Skipping outlier check for '{}': only {} values", field, values.len());
        return records;
    };

    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| match record.get(field).and_then(parse_number) {
            Some(value) => value >= lower && value <= upper,
            None => true,
        })
        .collect();

    tracing::debug!(
        "Outlier bounds for '{}': [{}, {}], removed {} records",
        field,
        lower,
        upper,
        before - kept.len()
    );
    kept
}

/// Drops records holding a value outside the 1.5 * IQR fences of a numeric
/// field. Fields are checked one after another, each on what the previous
/// check kept. Unparseable values never cause a removal.
pub fn remove_outliers(records: &[Record]) -> Vec<Record> {
    numeric_fields(records)
        .iter()
        .fold(records.to_vec(), |remaining, field| filter_field(remaining, field))
}
