use crate::domain::model::{CleaningResult, Record, StageConfig};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn input_format(&self) -> crate::adapters::ingest::InputFormat;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    /// Name of the ZIP bundle to write instead of loose files, if any.
    fn archive_name(&self) -> Option<&str>;
    fn stages(&self) -> StageConfig;
    fn insights(&self) -> Option<crate::adapters::insights::InsightSettings>;
}

/// Produces a short narrative about a cleaned data set.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, data: Vec<Record>) -> Result<CleaningResult>;
    async fn load(&self, result: &CleaningResult) -> Result<String>;
}
