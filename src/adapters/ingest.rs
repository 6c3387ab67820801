//! Turns uploaded or pasted text into records.

use crate::domain::model::Record;
use crate::utils::error::{CleanerError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// JSON if it parses as JSON, CSV otherwise.
    #[default]
    Auto,
    Csv,
    Json,
}

impl InputFormat {
    /// Picks the format from a file extension, falling back to `Auto`.
    pub fn from_path(path: &str) -> Self {
        match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Self::Csv,
            Some("json") => Self::Json,
            _ => Self::Auto,
        }
    }
}

impl std::str::FromStr for InputFormat {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(CleanerError::InvalidConfigValueError {
                field: "input.format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: auto, csv, json".to_string(),
            }),
        }
    }
}

fn object_to_record(index: usize, value: Value) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(Record::new(map)),
        other => Err(CleanerError::invalid_input(format!(
            "entry {} is not an object (found {})",
            index,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// An array of objects, or a single object treated as one record.
pub fn parse_json(text: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| object_to_record(index, item))
            .collect(),
        Value::Object(map) => Ok(vec![Record::new(map)]),
        other => Err(CleanerError::invalid_input(format!(
            "expected an array of objects, found {}",
            json_kind(&other)
        ))),
    }
}

/// Header row gives the field names; every cell is kept as text. Short rows
/// leave trailing fields absent and surplus cells are dropped. Blank lines
/// are skipped, but a row of empty cells is still a record.
pub fn parse_csv(text: &str) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(CleanerError::invalid_input("CSV input has no header row"));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let data: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(field, cell)| (field.to_string(), Value::String(cell.to_string())))
            .collect();
        records.push(Record::new(data));
    }

    Ok(records)
}

/// JSON first, then CSV.
pub fn parse_auto(text: &str) -> Result<Vec<Record>> {
    match parse_json(text) {
        Ok(records) => Ok(records),
        Err(CleanerError::SerializationError(e)) => {
            tracing::debug!("Input is not JSON ({}), trying CSV", e);
            parse_csv(text)
        }
        Err(e) => Err(e),
    }
}

pub fn parse_records(text: &str, format: InputFormat) -> Result<Vec<Record>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    match format {
        InputFormat::Auto => parse_auto(text),
        InputFormat::Csv => parse_csv(text),
        InputFormat::Json => parse_json(text),
    }
}
