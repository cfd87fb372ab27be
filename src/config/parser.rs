use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Loads and parses a configuration file from the given path
///
/// Keys missing from the file fall back to their defaults.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use politifact_links::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Page limit: {}", config.crawler.page_limit);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration
///
/// The hash is taken over the serialized form so that configurations built
/// from defaults and CLI overrides hash the same way as file-based ones.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash
/// * `Err(ConfigError)` - Failed to serialize the configuration
pub fn compute_config_hash(config: &Config) -> Result<String, ConfigError> {
    let content = toml::to_string(config)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Writes the resolved configuration into the save directory as a record of the run
///
/// Creates the save directory if it does not exist yet.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written record
/// * `Err(ConfigError)` - Failed to create the directory or write the file
pub fn persist_config(config: &Config) -> Result<PathBuf, ConfigError> {
    let dir = Path::new(&config.output.save_path);
    std::fs::create_dir_all(dir)?;

    let record_path = dir.join(&config.output.config_record_file);
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&record_path, content)?;

    Ok(record_path)
}
