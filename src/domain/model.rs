use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of input. Field order is the order the fields were first seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

fn enabled() -> bool {
    true
}

/// Which cleaning stages run. Every stage is on unless switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageConfig {
    #[serde(default = "enabled")]
    pub remove_duplicates: bool,
    #[serde(default = "enabled")]
    pub handle_missing: bool,
    #[serde(default = "enabled")]
    pub normalize_text: bool,
    #[serde(default = "enabled")]
    pub validate_emails: bool,
    #[serde(default = "enabled")]
    pub detect_outliers: bool,
}

impl StageConfig {
    pub fn all_enabled() -> Self {
        Self {
            remove_duplicates: true,
            handle_missing: true,
            normalize_text: true,
            validate_emails: true,
            detect_outliers: true,
        }
    }

    pub fn all_disabled() -> Self {
        Self {
            remove_duplicates: false,
            handle_missing: false,
            normalize_text: false,
            validate_emails: false,
            detect_outliers: false,
        }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::all_enabled()
    }
}

/// Counters gathered while cleaning.
///
/// `cleaned` is the final record count; there is no separate outlier counter,
/// so `original - duplicates_removed` may be larger than `cleaned`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningReport {
    pub original: usize,
    pub cleaned: usize,
    pub duplicates_removed: usize,
    pub missing_fixed: usize,
    pub invalid_emails: usize,
    pub ai_insights: Option<String>,
}

impl CleaningReport {
    pub fn new(original: usize) -> Self {
        Self {
            original,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct CleaningResult {
    pub records: Vec<Record>,
    pub report: CleaningReport,
}
