//! Narrative data-quality summary from a text-generation API.

use crate::domain::model::{CleaningReport, Record};
use crate::domain::ports::InsightProvider;
use crate::utils::error::{CleanerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stored in the report when the provider fails.
pub const INSIGHT_FALLBACK: &str =
    "Could not get an analysis from the AI service. Please check the API key.";

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_SAMPLE_SIZE: usize = 5;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSettings {
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl InsightSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: default_endpoint(),
            model: default_model(),
            sample_size: default_sample_size(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Prompt sent to the provider: a few cleaned rows plus the counters.
pub fn build_prompt(sample: &[Record], report: &CleaningReport) -> Result<String> {
    let sample_json = serde_json::to_string_pretty(sample)?;
    Ok(format!(
        "Analyze the following data and comment on its quality, potential problems, \
         and suggested improvements. Answer briefly (2-3 sentences).\n\n\
         Sample data:\n{}\n\n\
         Statistics:\n\
         - Original rows: {}\n\
         - Duplicate rows removed: {}\n\
         - Missing values fixed: {}\n\
         - Invalid emails: {}",
        sample_json,
        report.original,
        report.duplicates_removed,
        report.missing_fixed,
        report.invalid_emails
    ))
}

/// Asks the provider once and stores the answer, or the fallback text if the
/// call fails. Never returns an error.
pub async fn attach_insights<P: InsightProvider + ?Sized>(
    provider: &P,
    records: &[Record],
    sample_size: usize,
    report: &mut CleaningReport,
) {
    let sample = &records[..records.len().min(sample_size)];
    let outcome = match build_prompt(sample, report) {
        Ok(prompt) => provider.generate(&prompt).await,
        Err(e) => Err(e),
    };

    report.ai_insights = Some(match outcome {
        Ok(text) => {
            tracing::info!("🤖 Received data insights ({} chars)", text.len());
            text
        }
        Err(e) => {
            tracing::warn!("⚠️ Insight generation failed: {}", e);
            INSIGHT_FALLBACK.to_string()
        }
    });
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    text: String,
}

/// Google Generative Language `generateContent` client.
pub struct GeminiInsights {
    client: reqwest::Client,
    settings: InsightSettings,
}

impl GeminiInsights {
    pub fn new(settings: InsightSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, settings }
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model.trim()
        )
    }
}

#[async_trait]
impl InsightProvider for GeminiInsights {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!("Requesting insights from model '{}'", self.settings.model);
        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.settings.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CleanerError::InsightError {
                message: format!("API error ({}): {}", status, text),
            });
        }

        let parsed: GeminiResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| CleanerError::InsightError {
                message: "response contained no text".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    struct FailingProvider;

    #[async_trait]
    impl InsightProvider for FailingProvider {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(CleanerError::InsightError {
                message: "boom".to_string(),
            })
        }
    }

    struct EchoProvider;

    #[async_trait]
    impl InsightProvider for EchoProvider {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(format!("{} chars", prompt.len()))
        }
    }

    fn sample_records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| serde_json::from_value(json!({"id": i})).unwrap())
            .collect()
    }

    fn settings_for(server: &MockServer) -> InsightSettings {
        InsightSettings {
            endpoint: server.url("/v1beta/models"),
            ..InsightSettings::new("test-key")
        }
    }

    #[test]
    fn test_build_prompt_includes_sample_and_counters() {
        let mut report = CleaningReport::new(12);
        report.duplicates_removed = 2;
        report.missing_fixed = 3;
        report.invalid_emails = 1;

        let prompt = build_prompt(&sample_records(2), &report).unwrap();

        assert!(prompt.contains("\"id\": 1"));
        assert!(prompt.contains("Original rows: 12"));
        assert!(prompt.contains("Duplicate rows removed: 2"));
        assert!(prompt.contains("Missing values fixed: 3"));
        assert!(prompt.contains("Invalid emails: 1"));
    }

    #[tokio::test]
    async fn test_attach_insights_uses_fallback_on_failure() {
        let mut report = CleaningReport::new(1);
        report.cleaned = 1;

        attach_insights(&FailingProvider, &sample_records(1), 5, &mut report).await;

        assert_eq!(report.ai_insights.as_deref(), Some(INSIGHT_FALLBACK));
        assert_eq!(report.cleaned, 1);
    }

    #[tokio::test]
    async fn test_attach_insights_limits_sample() {
        let mut small = CleaningReport::new(0);
        let mut large = CleaningReport::new(0);

        attach_insights(&EchoProvider, &sample_records(5), 5, &mut small).await;
        attach_insights(&EchoProvider, &sample_records(50), 5, &mut large).await;

        assert_eq!(small.ai_insights, large.ai_insights);
    }

    #[tokio::test]
    async fn test_gemini_returns_first_candidate_text() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-pro:generateContent")
                .query_param("key", "test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "candidates": [
                        {"content": {"parts": [{"text": " Data looks clean. "}]}},
                        {"content": {"parts": [{"text": "ignored"}]}}
                    ]
                }));
        });

        let provider = GeminiInsights::new(settings_for(&server));
        let text = provider.generate("prompt").await.unwrap();

        api_mock.assert();
        assert_eq!(text, "Data looks clean.");
    }

    #[tokio::test]
    async fn test_gemini_error_status_is_insight_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-pro:generateContent");
            then.status(403).body("API key not valid");
        });

        let provider = GeminiInsights::new(settings_for(&server));
        let err = provider.generate("prompt").await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, CleanerError::InsightError { .. }));
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_gemini_empty_candidates_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"candidates": []}));
        });

        let provider = GeminiInsights::new(settings_for(&server));
        assert!(provider.generate("prompt").await.is_err());
    }
}
