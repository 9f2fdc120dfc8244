#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

use crate::embeddings::EMBEDDING_DIMENSION;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub search: SearchConfig,
    pub answer: AnswerConfig,
    /// Directory holding the knowledge-base JSON files
    pub data_dir: PathBuf,
}

/// Connection settings for the embedding backend (Ollama-compatible HTTP API)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub embedding_dimension: usize,
    /// Bound on backend probing at startup; on expiry the provider
    /// degrades to the deterministic keyword-hash mode
    pub init_timeout_secs: u64,
}

/// Connection settings for the chat-completion backend (OpenAI-compatible HTTP API)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub api_base: String,
    pub model: String,
    /// Environment variable holding the API key; the key itself is never
    /// written to the config file
    pub api_key_env: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

/// Retrieval tuning. These were tuned empirically against representative
/// query sets; treat them as starting points, not proven optima.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Fixed ceiling used to normalize raw keyword scores into [0, 1]
    pub keyword_score_ceiling: f32,
    /// Keyword share of the blended score
    pub keyword_weight: f32,
    /// Keyword share when the keyword signal is strong
    pub strong_keyword_weight: f32,
    /// Raw keyword score above which the strong weight applies
    pub strong_keyword_threshold: f32,
    pub excellent_score: f32,
    pub good_score: f32,
    pub fair_score: f32,
    /// Inclusive range the per-query top-K is drawn from
    pub min_top_k: usize,
    pub max_top_k: usize,
}

/// Answer-grounding tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnswerConfig {
    /// Minimum usable context length in characters
    pub min_context_chars: usize,
    /// Keyword-overlap ratio a generated answer must reach to be accepted
    pub min_overlap_ratio: f32,
    /// Raw overlap count that also satisfies the grounding gate
    pub min_overlap_count: usize,
    /// Per-chunk truncation length in the direct (non-generated) rendering
    pub snippet_chars: usize,
    /// Non-empty line cap applied to the final answer
    pub max_answer_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            generation: GenerationConfig::default(),
            search: SearchConfig::default(),
            answer: AnswerConfig::default(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 11434,
            model: "all-minilm:latest".to_string(),
            embedding_dimension: EMBEDDING_DIMENSION,
            init_timeout_secs: 20,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: 300,
            temperature: 0.1,
            timeout_secs: 30,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keyword_score_ceiling: 10.0,
            keyword_weight: 0.5,
            strong_keyword_weight: 0.6,
            strong_keyword_threshold: 3.0,
            excellent_score: 0.5,
            good_score: 0.3,
            fair_score: 0.2,
            min_top_k: 3,
            max_top_k: 4,
        }
    }
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            min_context_chars: 30,
            min_overlap_ratio: 0.3,
            min_overlap_count: 3,
            snippet_chars: 150,
            max_answer_lines: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid embedding dimension: {0} (must be between 64 and 4096)")]
    InvalidEmbeddingDimension(usize),
    #[error("Invalid timeout: {0} (must be between 1 and 300 seconds)")]
    InvalidTimeout(u64),
    #[error("Invalid score weight: {0} (must be between 0 and 1)")]
    InvalidWeight(f32),
    #[error("Invalid keyword score ceiling: {0} (must be positive)")]
    InvalidScoreCeiling(f32),
    #[error("Invalid top-K range: {0}..={1} (must be ascending and at most 20)")]
    InvalidTopKRange(usize, usize),
    #[error("Invalid quality thresholds: must be descending and within [0, 1]")]
    InvalidQualityThresholds,
    #[error("Invalid overlap ratio: {0} (must be between 0 and 1)")]
    InvalidOverlapRatio(f32),
    #[error("Invalid snippet length: {0} (must be between 50 and 1000 characters)")]
    InvalidSnippetChars(usize),
    #[error("Invalid answer line cap: {0} (must be between 1 and 50)")]
    InvalidAnswerLines(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Resolve the application config directory
    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("vx-assist"))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Load config from the default config directory, falling back to
    /// defaults when no file exists yet
    #[inline]
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_dir()?)
    }

    #[inline]
    pub fn load_from(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_dir.into().join("config.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.embedding.validate()?;
        self.generation.validate()?;
        self.search.validate()?;
        self.answer.validate()?;
        Ok(())
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::InvalidProtocol(self.protocol.clone()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        self.endpoint()?;

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        if !(64..=4096).contains(&self.embedding_dimension) {
            return Err(ConfigError::InvalidEmbeddingDimension(
                self.embedding_dimension,
            ));
        }

        if self.init_timeout_secs == 0 || self.init_timeout_secs > 300 {
            return Err(ConfigError::InvalidTimeout(self.init_timeout_secs));
        }

        Ok(())
    }

    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api_base).map_err(|_| ConfigError::InvalidUrl(self.api_base.clone()))?;

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ConfigError::InvalidTimeout(self.timeout_secs));
        }

        Ok(())
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keyword_score_ceiling <= 0.0 {
            return Err(ConfigError::InvalidScoreCeiling(self.keyword_score_ceiling));
        }

        for weight in [self.keyword_weight, self.strong_keyword_weight] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::InvalidWeight(weight));
            }
        }

        if self.min_top_k == 0 || self.min_top_k > self.max_top_k || self.max_top_k > 20 {
            return Err(ConfigError::InvalidTopKRange(self.min_top_k, self.max_top_k));
        }

        let thresholds = [self.excellent_score, self.good_score, self.fair_score];
        let descending = thresholds.windows(2).all(|pair| pair[0] >= pair[1]);
        if !descending || thresholds.iter().any(|t| !(0.0..=1.0).contains(t)) {
            return Err(ConfigError::InvalidQualityThresholds);
        }

        Ok(())
    }
}

impl AnswerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_overlap_ratio) {
            return Err(ConfigError::InvalidOverlapRatio(self.min_overlap_ratio));
        }

        if !(50..=1000).contains(&self.snippet_chars) {
            return Err(ConfigError::InvalidSnippetChars(self.snippet_chars));
        }

        if self.max_answer_lines == 0 || self.max_answer_lines > 50 {
            return Err(ConfigError::InvalidAnswerLines(self.max_answer_lines));
        }

        Ok(())
    }
}
