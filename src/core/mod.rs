pub mod cleaner;
pub mod etl;
pub mod pipeline;
pub mod stages;
pub mod stats;

pub use crate::domain::model::{CleaningReport, CleaningResult, Record, StageConfig};
pub use crate::domain::ports::{ConfigProvider, InsightProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
