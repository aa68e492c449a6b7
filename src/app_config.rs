use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::path::Path;

use crate::errors::TranslationError;
use crate::file_utils::FileManager;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings, and the read-only
/// capability tables consulted by translation.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Capability tables file; built-in tables are used when absent
    #[serde(default)]
    pub capabilities_file: Option<String>,

    /// Statistics JSON file
    #[serde(default = "default_statistics_file")]
    pub statistics_file: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching `log` filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Translation settings for both translator kinds
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TranslationConfig {
    /// Chat-style LLM settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Character-limited engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

/// LLM translation settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LlmConfig {
    // @field: Model name, key into the capability tables
    #[serde(default = "default_llm_model")]
    pub model: String,

    // @field: Fraction of the model token window used per prompt, in (0, 1]
    #[serde(default = "default_throttle")]
    pub throttle: f64,

    // @field: Wait between consecutive requests
    #[serde(default = "default_llm_request_timeout_secs")]
    pub request_timeout_secs: u64,

    // @field: Budget for a single response
    #[serde(default = "default_llm_response_timeout_secs")]
    pub response_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            throttle: default_throttle(),
            request_timeout_secs: default_llm_request_timeout_secs(),
            response_timeout_secs: default_llm_response_timeout_secs(),
        }
    }
}

/// Engine translation settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EngineConfig {
    // @field: Engine name, key into the capability tables
    #[serde(default = "default_engine")]
    pub engine: String,

    // @field: Wait between consecutive requests
    #[serde(default = "default_engine_request_timeout_secs")]
    pub request_timeout_secs: u64,

    // @field: Budget for a single response
    #[serde(default = "default_engine_response_timeout_secs")]
    pub response_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            request_timeout_secs: default_engine_request_timeout_secs(),
            response_timeout_secs: default_engine_response_timeout_secs(),
        }
    }
}

fn default_llm_model() -> String {
    "GPT-4o".to_string()
}

fn default_throttle() -> f64 {
    0.5
}

fn default_llm_request_timeout_secs() -> u64 {
    15
}

fn default_llm_response_timeout_secs() -> u64 {
    45
}

fn default_engine() -> String {
    "Google".to_string()
}

fn default_engine_request_timeout_secs() -> u64 {
    2
}

fn default_engine_response_timeout_secs() -> u64 {
    10
}

fn default_statistics_file() -> String {
    "statistics.json".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let llm = &self.translation.llm;
        if !(llm.throttle > 0.0 && llm.throttle <= 1.0) {
            return Err(anyhow!("Model throttle must be in (0, 1], got {}", llm.throttle));
        }
        if llm.model.trim().is_empty() {
            return Err(anyhow!("LLM model name must not be empty"));
        }
        if llm.response_timeout_secs == 0 {
            return Err(anyhow!("LLM response timeout must be at least one second"));
        }

        let engine = &self.translation.engine;
        if engine.engine.trim().is_empty() {
            return Err(anyhow!("Engine name must not be empty"));
        }
        if engine.response_timeout_secs == 0 {
            return Err(anyhow!("Engine response timeout must be at least one second"));
        }

        Ok(())
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load a configuration file, writing the defaults there when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if FileManager::file_exists(path) {
            return Self::from_file(path);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save_to_file(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        FileManager::write_to_file(path, &config_json)
    }

    /// Capability tables from `capabilities_file`, or the built-in ones
    pub fn capabilities(&self) -> Result<CapabilityTables> {
        match &self.capabilities_file {
            Some(path) => CapabilityTables::from_file(path),
            None => Ok(CapabilityTables::default()),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            translation: TranslationConfig::default(),
            capabilities_file: None,
            statistics_file: default_statistics_file(),
            log_level: LogLevel::default(),
        }
    }
}

/// Provider model entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Identifier sent to the provider
    pub name: String,

    /// Token window
    pub tokens: u64,
}

/// Read-only tables describing languages, models and engines
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CapabilityTables {
    /// Language code to the name used in prompts
    #[serde(default)]
    pub codes: BTreeMap<String, String>,

    /// Model name to provider model info
    #[serde(default)]
    pub models: BTreeMap<String, ModelInfo>,

    /// Engine name to character limit per request
    #[serde(default)]
    pub engines: BTreeMap<String, usize>,
}

impl CapabilityTables {
    /// Load tables from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse capability tables: {:?}", path))
    }

    /// Human language name for prompts, falling back to the ISO 639 name and then the code itself
    pub fn language_name(&self, code: &str) -> String {
        if let Some(name) = self.codes.get(code) {
            return name.clone();
        }
        language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string())
    }

    /// Model lookup
    pub fn model(&self, name: &str) -> Result<&ModelInfo, TranslationError> {
        self.models
            .get(name)
            .ok_or_else(|| TranslationError::UnknownModel(name.to_string()))
    }

    /// Engine character limit lookup
    pub fn engine_limit(&self, name: &str) -> Result<usize, TranslationError> {
        self.engines
            .get(name)
            .copied()
            .ok_or_else(|| TranslationError::UnknownEngine(name.to_string()))
    }
}

impl Default for CapabilityTables {
    fn default() -> Self {
        let codes = [
            ("en", "English"),
            ("fr", "French"),
            ("de", "German"),
            ("es", "Spanish"),
            ("it", "Italian"),
            ("pt", "Portuguese"),
            ("ru", "Russian"),
            ("uk", "Ukrainian"),
            ("pl", "Polish"),
            ("nl", "Dutch"),
            ("tr", "Turkish"),
            ("ar", "Arabic"),
            ("ja", "Japanese"),
            ("ko", "Korean"),
            ("zh", "Chinese Simplified"),
            ("zh-TW", "Chinese Traditional"),
        ]
        .into_iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect();

        let models = [
            ("GPT-4o", "gpt-4o-mini", 2048),
            ("Claude", "claude-3-haiku-20240307", 2048),
            ("Llama", "meta-llama/Llama-3.3-70B-Instruct-Turbo", 2048),
            ("Mistral", "mistralai/Mistral-Small-24B-Instruct-2501", 2048),
        ]
        .into_iter()
        .map(|(key, name, tokens)| (key.to_string(), ModelInfo { name: name.to_string(), tokens }))
        .collect();

        let engines = [("Google", 5000), ("DeepL", 1500), ("Yandex", 10000)]
            .into_iter()
            .map(|(name, limit)| (name.to_string(), limit))
            .collect();

        Self { codes, models, engines }
    }
}
