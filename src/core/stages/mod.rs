//! The five cleaning stages. Each takes the current records by reference and
//! returns a fresh set, so a stage never observes its own partial output.

pub mod dedup;
pub mod email;
pub mod impute;
pub mod normalize;
pub mod outliers;

pub use dedup::remove_duplicates;
pub use email::count_invalid_emails;
pub use impute::fill_missing;
pub use normalize::normalize_text;
pub use outliers::remove_outliers;

/// Field names are matched case-insensitively by substring.
pub(crate) fn field_mentions(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}
