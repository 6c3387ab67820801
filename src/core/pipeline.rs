use crate::adapters::export::{self, CSV_FILENAME, JSON_FILENAME, REPORT_FILENAME};
use crate::adapters::ingest;
use crate::adapters::insights::{attach_insights, GeminiInsights};
use crate::core::cleaner::clean_records;
use crate::core::{CleaningResult, ConfigProvider, InsightProvider, Pipeline, Record, Storage};
use crate::utils::error::{CleanerError, Result};
use std::path::Path;

/// Reads one input file, cleans it and writes the results next to each other
/// in the output directory.
pub struct CleaningPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    insights: Option<Box<dyn InsightProvider>>,
    sample_size: usize,
}

impl<S: Storage, C: ConfigProvider> CleaningPipeline<S, C> {
    /// Uses the Gemini client when the configuration enables insights.
    pub fn new(storage: S, config: C) -> Self {
        let settings = config.insights();
        let sample_size = settings
            .as_ref()
            .map(|s| s.sample_size)
            .unwrap_or(crate::adapters::insights::DEFAULT_SAMPLE_SIZE);
        let insights = settings
            .map(|s| Box::new(GeminiInsights::new(s)) as Box<dyn InsightProvider>);

        Self {
            storage,
            config,
            insights,
            sample_size,
        }
    }

    /// Replaces the insight provider, e.g. with a local model or a stub.
    pub fn with_insight_provider(mut self, provider: Box<dyn InsightProvider>) -> Self {
        self.insights = Some(provider);
        self
    }

    pub fn without_insights(mut self) -> Self {
        self.insights = None;
        self
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CleaningPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let path = self.config.input_path();
        tracing::debug!("Reading input from: {}", path);

        let bytes = self.storage.read_file(path).await?;
        let text = String::from_utf8(bytes)
            .map_err(|e| CleanerError::invalid_input(format!("{} is not valid UTF-8: {}", path, e)))?;

        let format = self.config.input_format();
        tracing::debug!("Parsing input as {:?}", format);
        ingest::parse_records(&text, format)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<CleaningResult> {
        let stages = self.config.stages();
        tracing::debug!("Stage configuration: {:?}", stages);

        let mut result = clean_records(data, &stages);

        // 計數已定稿後才呼叫 AI，失敗只會寫入備用訊息
        if let Some(provider) = &self.insights {
            attach_insights(
                provider.as_ref(),
                &result.records,
                self.sample_size,
                &mut result.report,
            )
            .await;
        }

        Ok(result)
    }

    async fn load(&self, result: &CleaningResult) -> Result<String> {
        let mut files: Vec<(&str, String)> = Vec::new();
        if self.wants("csv") {
            files.push((CSV_FILENAME, export::to_csv(&result.records)?));
        }
        if self.wants("json") {
            files.push((JSON_FILENAME, export::to_json(&result.records)?));
        }
        files.push((REPORT_FILENAME, export::report_json(&result.report)?));

        if let Some(archive_name) = self.config.archive_name() {
            let entries: Vec<(&str, &str)> = files
                .iter()
                .map(|(name, contents)| (*name, contents.as_str()))
                .collect();
            let zip_data = export::bundle_zip(&entries)?;

            let output_path = self.output_file(archive_name);
            tracing::debug!("Writing ZIP file ({} bytes) to {}", zip_data.len(), output_path);
            self.storage.write_file(&output_path, &zip_data).await?;
            return Ok(output_path);
        }

        for (name, contents) in &files {
            let path = self.output_file(name);
            tracing::debug!("Writing {}", path);
            self.storage.write_file(&path, contents.as_bytes()).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
