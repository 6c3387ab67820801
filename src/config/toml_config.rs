use crate::adapters::ingest::InputFormat;
use crate::adapters::insights::{
    InsightSettings, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_SAMPLE_SIZE, DEFAULT_TIMEOUT_SECONDS,
};
use crate::domain::model::StageConfig;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CleanerError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    pub input: InputConfig,
    #[serde(default)]
    pub stages: StageConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub format: Option<InputFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default)]
    pub enabled: bool,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub sample_size: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: default_output_formats(),
            compression: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    #[serde(default = "default_archive_name")]
    pub filename: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub enabled: bool,
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string(), "json".to_string()]
}

pub fn default_archive_name() -> String {
    "cleaned_data.zip".to_string()
}

/// Keys still holding a `${VAR}` placeholder were never set.
fn is_resolved_secret(value: &str) -> bool {
    !value.trim().is_empty() && !ENV_VAR_RE.is_match(value)
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CleanerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CleanerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("input.path", &self.input.path)?;
        if self.input.format.is_none() {
            validation::validate_input_extension("input.path", &self.input.path)?;
        }

        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_output_formats("output.output_formats", &self.output.output_formats)?;

        if let Some(compression) = &self.output.compression {
            if compression.enabled {
                validation::validate_non_empty_string(
                    "output.compression.filename",
                    &compression.filename,
                )?;
            }
        }

        if self.insights.enabled {
            let api_key = validation::validate_required_field("insights.api_key", &self.insights.api_key)?;
            if !is_resolved_secret(api_key) {
                return Err(CleanerError::MissingConfigError {
                    field: "insights.api_key".to_string(),
                });
            }
            if let Some(endpoint) = &self.insights.endpoint {
                validation::validate_url("insights.endpoint", endpoint)?;
            }
            if let Some(sample_size) = self.insights.sample_size {
                validation::validate_range("insights.sample_size", sample_size, 1, 100)?;
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn input_format(&self) -> InputFormat {
        self.input
            .format
            .unwrap_or_else(|| InputFormat::from_path(&self.input.path))
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.output_formats
    }

    fn archive_name(&self) -> Option<&str> {
        self.output
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }

    fn stages(&self) -> StageConfig {
        self.stages
    }

    fn insights(&self) -> Option<InsightSettings> {
        if !self.insights.enabled {
            return None;
        }
        let api_key = self.insights.api_key.as_deref().filter(|k| is_resolved_secret(k))?;
        Some(InsightSettings {
            api_key: api_key.to_string(),
            endpoint: self
                .insights
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: self
                .insights
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            sample_size: self.insights.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE),
            timeout_seconds: self
                .insights
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
