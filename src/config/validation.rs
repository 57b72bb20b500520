use crate::config::types::{CacheConfig, Config, DirectoryConfig, HttpConfig, NearbyConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_directory_config(&config.directory)?;
    validate_nearby_config(&config.nearby)?;
    validate_cache_config(&config.cache)?;
    validate_http_config(&config.http)?;
    Ok(())
}

fn validate_directory_config(config: &DirectoryConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;

    if !config.index_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "index-path must start with '/', got '{}'",
            config.index_path
        )));
    }

    Ok(())
}

fn validate_nearby_config(config: &NearbyConfig) -> Result<(), ConfigError> {
    validate_http_url("api-url", &config.api_url)?;

    if config.radius < 1 {
        return Err(ConfigError::Validation(format!(
            "radius must be >= 1, got {}",
            config.radius
        )));
    }

    if config.max_matches < 1 {
        return Err(ConfigError::Validation(format!(
            "max-matches must be >= 1, got {}",
            config.max_matches
        )));
    }

    if config.api_key_env.is_empty() {
        return Err(ConfigError::Validation(
            "api-key-env cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "cache path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got timeout-secs={} connect-timeout-secs={}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Requires an absolute http or https URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
