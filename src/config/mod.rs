pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::ingest::InputFormat;
#[cfg(feature = "cli")]
use crate::adapters::insights::{InsightSettings, DEFAULT_MODEL, DEFAULT_SAMPLE_SIZE};
#[cfg(feature = "cli")]
use crate::domain::{model::StageConfig, ports::ConfigProvider};
#[cfg(feature = "cli")]
use crate::utils::error::{CleanerError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "record-cleaner")]
#[command(about = "Clean a CSV or JSON batch: dedupe, fill gaps, normalize, audit emails, drop outliers")]
pub struct CliConfig {
    /// CSV or JSON file to clean
    #[arg(short, long)]
    pub input: Option<String>,

    /// Input format (auto, csv, json); guessed from the extension by default
    #[arg(long)]
    pub format: Option<InputFormat>,

    /// TOML configuration file; flags given here override it
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv,json")]
    pub output_formats: Vec<String>,

    /// Write a single ZIP bundle instead of loose files
    #[arg(long)]
    pub zip: bool,

    #[arg(long, default_value = "cleaned_data.zip")]
    pub archive_name: String,

    #[arg(long, help = "Keep duplicate records")]
    pub no_dedup: bool,

    #[arg(long, help = "Leave missing values as they are")]
    pub no_fill_missing: bool,

    #[arg(long, help = "Skip trimming and casing of text fields")]
    pub no_normalize: bool,

    #[arg(long, help = "Skip the email audit")]
    pub no_email_check: bool,

    #[arg(long, help = "Keep statistical outliers")]
    pub no_outliers: bool,

    /// Ask the Gemini API for a short data-quality summary
    #[arg(long)]
    pub use_ai: bool,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log time and memory per phase")]
    pub monitor: bool,

    /// Print the first N cleaned records after the summary
    #[arg(long, value_name = "N")]
    pub preview: Option<usize>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Flags that differ from their defaults win over the TOML file.
    pub fn apply_overrides(&self, config: &mut toml_config::TomlConfig) {
        if let Some(input) = &self.input {
            config.input.path = input.clone();
        }
        if let Some(format) = self.format {
            config.input.format = Some(format);
        }
        if self.no_dedup {
            config.stages.remove_duplicates = false;
        }
        if self.no_fill_missing {
            config.stages.handle_missing = false;
        }
        if self.no_normalize {
            config.stages.normalize_text = false;
        }
        if self.no_email_check {
            config.stages.validate_emails = false;
        }
        if self.no_outliers {
            config.stages.detect_outliers = false;
        }
        if self.use_ai {
            config.insights.enabled = true;
        }
        if let Some(api_key) = &self.api_key {
            config.insights.api_key = Some(api_key.clone());
        }
        if self.model != DEFAULT_MODEL {
            config.insights.model = Some(self.model.clone());
        }
        if self.zip {
            config.output.compression = Some(toml_config::CompressionConfig {
                enabled: true,
                filename: self.archive_name.clone(),
            });
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn input_format(&self) -> InputFormat {
        self.format
            .unwrap_or_else(|| InputFormat::from_path(self.input_path()))
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn archive_name(&self) -> Option<&str> {
        self.zip.then_some(self.archive_name.as_str())
    }

    fn stages(&self) -> StageConfig {
        StageConfig {
            remove_duplicates: !self.no_dedup,
            handle_missing: !self.no_fill_missing,
            normalize_text: !self.no_normalize,
            validate_emails: !self.no_email_check,
            detect_outliers: !self.no_outliers,
        }
    }

    fn insights(&self) -> Option<InsightSettings> {
        if !self.use_ai {
            return None;
        }
        let api_key = self.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        Some(InsightSettings {
            model: self.model.clone(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            ..InsightSettings::new(api_key)
        })
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let input = validation::validate_required_field("input", &self.input)?;
        validation::validate_path("input", input)?;
        if self.format.is_none() {
            validation::validate_input_extension("input", input)?;
        }

        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;
        if self.zip {
            validation::validate_non_empty_string("archive_name", &self.archive_name)?;
        }

        if self.use_ai && self.insights().is_none() {
            return Err(CleanerError::MissingConfigError {
                field: "api_key (or GEMINI_API_KEY)".to_string(),
            });
        }

        Ok(())
    }
}
