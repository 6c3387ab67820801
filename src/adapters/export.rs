//! Serializes cleaning results for download.

use crate::core::stats::value_as_text;
use crate::domain::model::{CleaningReport, Record};
use crate::utils::error::Result;
use indexmap::IndexSet;
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const CSV_FILENAME: &str = "cleaned_data.csv";
pub const JSON_FILENAME: &str = "cleaned_data.json";
pub const REPORT_FILENAME: &str = "report.json";

/// Every field name across the records, in first-seen order.
pub fn collect_headers(records: &[Record]) -> Vec<&str> {
    let mut headers: IndexSet<&str> = IndexSet::new();
    for record in records {
        headers.extend(record.fields().map(String::as_str));
    }
    headers.into_iter().collect()
}

pub fn to_csv(records: &[Record]) -> Result<String> {
    let headers = collect_headers(records);
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !headers.is_empty() {
        writer.write_record(&headers)?;
    }
    for record in records {
        let row = headers
            .iter()
            .map(|field| record.get(field).map(value_as_text).unwrap_or_default());
        writer.write_record(row.map(|cell| cell.into_owned()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn to_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportDocument<'a> {
    #[serde(flatten)]
    report: &'a CleaningReport,
    generated_at: String,
}

/// The report plus the time it was written.
pub fn report_json(report: &CleaningReport) -> Result<String> {
    let document = ReportDocument {
        report,
        generated_at: chrono::Utc::now().to_rfc3339(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Packs `(name, contents)` pairs into one ZIP archive.
pub fn bundle_zip(files: &[(&str, &str)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, contents) in files {
        zip.start_file::<_, ()>(*name, FileOptions::default())?;
        zip.write_all(contents.as_bytes())?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
