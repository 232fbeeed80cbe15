use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::collab::lexical::DEFAULT_MTLD_THRESHOLD;
use crate::detect::FillerMatching;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_LLM_TIMEOUT: &str = "30s";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_GRAMMAR_TIMEOUT: &str = "10s";

/// Top-level configuration file. Every section is optional.
///
/// Example YAML:
/// ```yaml
/// llm:
///   model: gemini-2.5-flash
///   max_tokens: 300
///   timeout: 30s
/// grammar:
///   server_url: http://localhost:8081
/// fillers:
///   matching: phrase
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<GrammarConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<VocabularyConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fillers: Option<FillerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

impl Config {
    pub fn llm_required(&self) -> bool {
        self.llm.as_ref().and_then(|l| l.required).unwrap_or(false)
    }

    pub fn filler_matching(&self) -> FillerMatching {
        self.fillers
            .as_ref()
            .and_then(|f| f.matching)
            .unwrap_or_default()
    }

    pub fn log_file(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.file.as_deref())
    }
}

/// Generative-text refiner settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API base URL, without the `/models/...` suffix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Request timeout, humantime format ("30s", "1m")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Refuse to score without an API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Resolved LLM settings with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl LlmConfig {
    pub fn settings(&self) -> Result<LlmSettings> {
        let timeout_str = self.timeout.as_deref().unwrap_or(DEFAULT_LLM_TIMEOUT);
        let timeout = humantime::parse_duration(timeout_str)
            .with_context(|| format!("llm.timeout: invalid duration '{}'", timeout_str))?;
        Ok(LlmSettings {
            model: self.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: self
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout,
        })
    }
}

/// Grammar checker settings. No `server_url` means grammar checks are off.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GrammarConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl GrammarConfig {
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn timeout(&self) -> Result<Duration> {
        let timeout_str = self.timeout.as_deref().unwrap_or(DEFAULT_GRAMMAR_TIMEOUT);
        humantime::parse_duration(timeout_str)
            .with_context(|| format!("grammar.timeout: invalid duration '{}'", timeout_str))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SentimentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VocabularyConfig {
    /// Compute MTLD alongside the type-token ratio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtld: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtld_threshold: Option<f64>,
}

impl VocabularyConfig {
    pub fn mtld_threshold(&self) -> f64 {
        self.mtld_threshold.unwrap_or(DEFAULT_MTLD_THRESHOLD)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FillerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching: Option<FillerMatching>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Append log lines to this file instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}
