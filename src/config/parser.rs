use crate::config::types::{Config, NearbyConfig, SecretFile};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
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
/// use park_atlas::config::load_config;
///
/// let config = load_config(Path::new("atlas.toml")).unwrap();
/// println!("Cache file: {}", config.cache.path.display());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two sessions can be told apart when they were run
/// against different upstream endpoints.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Resolves the nearby-places API key
///
/// The environment variable named by `api-key-env` wins over the secret file.
/// Returns `Ok(None)` when neither source provides a key; an unreadable or
/// malformed secret file is an error.
pub fn resolve_api_key(config: &NearbyConfig) -> Result<Option<String>, ConfigError> {
    if let Ok(key) = std::env::var(&config.api_key_env) {
        let key = key.trim();
        if !key.is_empty() {
            return Ok(Some(key.to_string()));
        }
    }

    let Some(path) = &config.api_key_file else {
        return Ok(None);
    };

    if !path.exists() {
        tracing::debug!("API key file {} not present", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let secret: SecretFile = toml::from_str(&content)?;
    let key = secret.api_key.trim();

    Ok((!key.is_empty()).then(|| key.to_string()))
}
