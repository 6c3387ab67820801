use crate::core::{CleaningReport, Pipeline, Record};
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: String,
    pub report: CleaningReport,
    /// First cleaned records, empty unless a preview was requested.
    pub preview: Vec<Record>,
}

pub struct CleaningEngine<P: Pipeline> {
    pipeline: P,
    monitor_enabled: bool,
    preview_rows: usize,
}

impl<P: Pipeline> CleaningEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
            preview_rows: 0,
        }
    }

    /// Keep the first `rows` cleaned records in the summary.
    pub fn with_preview(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let mut monitor = RunMonitor::new(self.monitor_enabled);
        tracing::info!("🚀 Starting cleaning run");

        let records = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} records", records.len());
        monitor.end_phase("extract");

        let result = self.pipeline.transform(records).await?;
        let report = &result.report;
        tracing::info!(
            "🧼 Cleaned {} -> {} records (duplicates: {}, missing fixed: {}, invalid emails: {})",
            report.original,
            report.cleaned,
            report.duplicates_removed,
            report.missing_fixed,
            report.invalid_emails
        );
        monitor.end_phase("transform");

        let output_path = self.pipeline.load(&result).await?;
        tracing::info!("📁 Output saved to: {}", output_path);
        monitor.end_phase("load");
        monitor.log_final_stats();

        let preview = result.records.iter().take(self.preview_rows).cloned().collect();

        Ok(RunSummary {
            output_path,
            report: result.report,
            preview,
        })
    }
}
