use propensity_core::{ExchangeRates, SurveyLookups, DEFAULT_THRESHOLD};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::campaign::LabelMode;
use crate::linker::{NameScorer, RecordLinker};
use crate::rates::DEFAULT_RATES_URL;
use crate::table::TableProfile;

/// Overrides `rates.api_key` when set.
pub const API_KEY_ENV: &str = "PROPENSITY_RATES_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub sources: SourcesConfig,
    #[serde(default)]
    pub rates: RatesConfig,
    #[serde(default)]
    pub linking: LinkingConfig,
    #[serde(default)]
    pub survey: SurveyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub campaign: PathBuf,
    pub mortgage: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub labels: LabelMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    #[serde(default = "default_rates_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    /// When non-empty, used instead of fetching.
    #[serde(default)]
    pub fixed: ExchangeRates,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkingConfig {
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    #[serde(default)]
    pub scorer: NameScorer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(flatten)]
    pub lookups: SurveyLookups,
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_rates_url() -> String {
    DEFAULT_RATES_URL.to_string()
}

fn default_cutoff() -> f64 {
    0.6
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            base_url: default_rates_url(),
            api_key: None,
            fixed: ExchangeRates::default(),
        }
    }
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            scorer: NameScorer::default(),
        }
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            lookups: SurveyLookups::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file; relative source paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        if let Some(dir) = path.parent() {
            config.sources.campaign = dir.join(&config.sources.campaign);
            config.sources.mortgage = dir.join(&config.sources.mortgage);
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.delimiter.len() != 1 {
            return Err(ConfigError::Invalid(format!(
                "delimiter must be a single byte, got '{}'",
                self.sources.delimiter
            )));
        }
        if !(0.0..=1.0).contains(&self.linking.cutoff) {
            return Err(ConfigError::Invalid(format!(
                "linking.cutoff must be within [0, 1], got {}",
                self.linking.cutoff
            )));
        }
        if !(0.0..=1.0).contains(&self.survey.threshold) {
            return Err(ConfigError::Invalid(format!(
                "survey.threshold must be within [0, 1], got {}",
                self.survey.threshold
            )));
        }
        Ok(())
    }

    pub fn table_profile(&self) -> TableProfile {
        TableProfile {
            delimiter: self.sources.delimiter.clone(),
        }
    }

    pub fn linker(&self) -> RecordLinker {
        RecordLinker::new(self.linking.cutoff, self.linking.scorer)
    }
}

impl RatesConfig {
    /// The environment variable wins over the file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }
}
