//! Value-level helpers shared by the cleaning stages: missing detection,
//! numeric parsing and the small statistics the stages need.

use indexmap::IndexMap;
use serde_json::{Number, Value};
use std::borrow::Cow;

/// String values that stand in for "no value".
pub const MISSING_TOKENS: &[&str] = &["N/A", "null", "undefined"];

/// Multiplier applied to the interquartile range to get the fences.
pub const IQR_FENCE: f64 = 1.5;

/// Fields with this many numeric values or fewer are never filtered.
pub const MIN_OUTLIER_SAMPLE: usize = 4;

pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty() || MISSING_TOKENS.contains(&s.as_str()),
        Some(_) => false,
    }
}

/// Reads a value as a finite number. Strings are trimmed first; anything else
/// that is not a JSON number is not numeric.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// More than half of `total` must be numeric.
pub fn is_mostly_numeric(numeric: usize, total: usize) -> bool {
    numeric * 2 > total
}

/// Value at index `floor(n/2)` of the sorted input, i.e. the upper median for
/// even lengths.
pub fn upper_median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    Some(values[values.len() / 2])
}

/// Key used to count equal values. Strings count by their content, other
/// scalars by their JSON text.
fn frequency_key(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Most frequent value. On a tie the value that was seen first wins.
pub fn most_common<'a, I>(values: I) -> Option<&'a Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut counts: IndexMap<Cow<'a, str>, (&'a Value, usize)> = IndexMap::new();
    for value in values {
        counts
            .entry(frequency_key(value))
            .or_insert((value, 0))
            .1 += 1;
    }

    let mut best: Option<(&Value, usize)> = None;
    for (value, count) in counts.into_values() {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value)
}

/// Inclusive non-outlier range `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]` for values that
/// are already sorted ascending. `None` for small samples.
pub fn iqr_bounds(sorted: &[f64]) -> Option<(f64, f64)> {
    let n = sorted.len();
    if n <= MIN_OUTLIER_SAMPLE {
        return None;
    }
    let q1 = sorted[(n as f64 * 0.25).floor() as usize];
    let q3 = sorted[(n as f64 * 0.75).floor() as usize];
    let iqr = q3 - q1;
    Some((q1 - IQR_FENCE * iqr, q3 + IQR_FENCE * iqr))
}

/// Whole numbers become JSON integers so that `3` does not turn into `3.0`.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Plain text form of a scalar: strings as-is, null as empty.
pub fn value_as_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// Whether a value counts as "set" in a boolean context.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
