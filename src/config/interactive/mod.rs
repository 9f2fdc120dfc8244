use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};

use super::{Config, ConfigError, EmbeddingConfig, GenerationConfig};

#[inline]
pub fn run_interactive_config() -> Result<()> {
    eprintln!("{}", style("🔧 VX Assist Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config()?;

    eprintln!("{}", style("Embedding Backend").bold().yellow());
    eprintln!("Configure the Ollama-compatible instance used for embedding generation.");
    eprintln!();
    configure_embedding(&mut config.embedding)?;

    eprintln!();
    eprintln!("{}", style("Generation Backend").bold().yellow());
    eprintln!("Configure the chat-completion API used for answer generation.");
    eprintln!();
    configure_generation(&mut config.generation)?;

    eprintln!();
    let data_dir: String = Input::new()
        .with_prompt("Knowledge base directory")
        .default(config.data_dir.display().to_string())
        .interact_text()?;
    config.data_dir = data_dir.into();

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());

        let config_path = Config::config_file_path().context("Failed to get config file path")?;
        eprintln!(
            "Configuration saved to: {}",
            style(config_path.display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Embedding Backend:").bold().yellow());
    eprintln!("  Host: {}", style(&config.embedding.host).cyan());
    eprintln!("  Port: {}", style(config.embedding.port).cyan());
    eprintln!("  Model: {}", style(&config.embedding.model).cyan());
    eprintln!(
        "  Dimension: {}",
        style(config.embedding.embedding_dimension).cyan()
    );
    match config.embedding.endpoint() {
        Ok(url) => eprintln!("  Endpoint: {}", style(url).cyan()),
        Err(e) => eprintln!("  Endpoint: {} ({})", style("Invalid").red(), e),
    }

    eprintln!();
    eprintln!("{}", style("Generation Backend:").bold().yellow());
    eprintln!("  API base: {}", style(&config.generation.api_base).cyan());
    eprintln!("  Model: {}", style(&config.generation.model).cyan());
    eprintln!(
        "  API key env: {}",
        style(&config.generation.api_key_env).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Retrieval Tuning:").bold().yellow());
    eprintln!(
        "  Keyword weight: {} (strong: {})",
        style(config.search.keyword_weight).cyan(),
        style(config.search.strong_keyword_weight).cyan()
    );
    eprintln!(
        "  Top-K range: {}..={}",
        style(config.search.min_top_k).cyan(),
        style(config.search.max_top_k).cyan()
    );

    eprintln!();
    eprintln!(
        "Knowledge base: {}",
        style(config.data_dir.display()).cyan()
    );

    let config_path = Config::config_file_path().context("Failed to get config file path")?;
    eprintln!("Config file: {}", style(config_path.display()).dim());

    Ok(())
}

fn load_existing_config() -> Result<Config> {
    Config::load().map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No existing configuration found. Using defaults.").yellow()
            );
            Ok(Config::default())
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            Ok(config)
        },
    )
}

fn configure_embedding(embedding: &mut EmbeddingConfig) -> Result<()> {
    let protocols = &["http", "https"];
    let default_index = protocols
        .iter()
        .position(|&p| p == embedding.protocol)
        .unwrap_or(0);

    let protocol_index = Select::new()
        .with_prompt("Embedding backend protocol")
        .default(default_index)
        .items(protocols)
        .interact()?;
    embedding.protocol = protocols[protocol_index].to_string();

    embedding.host = Input::new()
        .with_prompt("Embedding backend host")
        .default(embedding.host.clone())
        .interact_text()?;

    embedding.port = Input::new()
        .with_prompt("Embedding backend port")
        .default(embedding.port)
        .validate_with(|port: &u16| -> Result<(), ConfigError> {
            if *port == 0 {
                Err(ConfigError::InvalidPort(*port))
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    embedding.model = Input::new()
        .with_prompt("Embedding model")
        .default(embedding.model.clone())
        .validate_with(|model: &String| -> Result<(), ConfigError> {
            if model.trim().is_empty() {
                Err(ConfigError::InvalidModel(model.clone()))
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    Ok(())
}

fn configure_generation(generation: &mut GenerationConfig) -> Result<()> {
    generation.api_base = Input::new()
        .with_prompt("Chat-completion API base URL")
        .default(generation.api_base.clone())
        .validate_with(|api_base: &String| -> Result<(), ConfigError> {
            url::Url::parse(api_base)
                .map(|_| ())
                .map_err(|_| ConfigError::InvalidUrl(api_base.clone()))
        })
        .interact_text()?;

    generation.model = Input::new()
        .with_prompt("Chat-completion model")
        .default(generation.model.clone())
        .validate_with(|model: &String| -> Result<(), ConfigError> {
            if model.trim().is_empty() {
                Err(ConfigError::InvalidModel(model.clone()))
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    generation.api_key_env = Input::new()
        .with_prompt("Environment variable holding the API key")
        .default(generation.api_key_env.clone())
        .interact_text()?;

    Ok(())
}
