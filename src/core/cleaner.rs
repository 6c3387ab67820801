use crate::core::stages::{
    count_invalid_emails, fill_missing, normalize_text, remove_duplicates, remove_outliers,
};
use crate::domain::model::{CleaningReport, CleaningResult, Record, StageConfig};

/// Runs the enabled stages in their fixed order:
/// duplicates, missing values, text, emails, outliers.
///
/// `ai_insights` is always `None` here; it is filled in afterwards by the
/// insight step, once the counters below are final.
pub fn clean_records(records: Vec<Record>, stages: &StageConfig) -> CleaningResult {
    let mut report = CleaningReport::new(records.len());
    let mut current = records;

    if stages.remove_duplicates {
        let (unique, removed) = remove_duplicates(&current);
        tracing::debug!("🧹 Duplicates: removed {} of {} records", removed, current.len());
        report.duplicates_removed = removed;
        current = unique;
    }

    if stages.handle_missing {
        let (filled, fixed) = fill_missing(&current);
        tracing::debug!("🧩 Missing values: filled {}", fixed);
        report.missing_fixed += fixed;
        current = filled;
    }

    if stages.normalize_text {
        current = normalize_text(&current);
        tracing::debug!("🔤 Text normalized for {} records", current.len());
    }

    if stages.validate_emails {
        let invalid = count_invalid_emails(&current);
        tracing::debug!("📧 Invalid emails: {}", invalid);
        report.invalid_emails += invalid;
    }

    if stages.detect_outliers {
        let before = current.len();
        current = remove_outliers(&current);
        tracing::debug!("📈 Outliers: removed {} records", before - current.len());
    }

    report.cleaned = current.len();

    CleaningResult {
        records: current,
        report,
    }
}
