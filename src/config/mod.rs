// Configuration management module
// TOML settings for the embedding backend, generation backend, and retrieval tuning

pub mod interactive;
pub mod settings;

pub use interactive::{run_interactive_config, show_config};
pub use settings::{
    AnswerConfig, Config, ConfigError, EmbeddingConfig, GenerationConfig, SearchConfig,
};

/// Get the configuration directory path
#[inline]
pub fn get_config_dir() -> Result<std::path::PathBuf, ConfigError> {
    Config::config_dir()
}
