pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    cleaner::clean_records,
    etl::{CleaningEngine, RunSummary},
    pipeline::CleaningPipeline,
};
pub use domain::model::{CleaningReport, CleaningResult, Record, StageConfig};
pub use utils::error::{CleanerError, Result};
