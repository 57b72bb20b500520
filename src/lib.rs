//! Park-Atlas: a cached browser for the national parks directory
//!
//! This crate crawls the park service directory for state listings and site
//! details, enriches sites with nearby places from a radius-search API, and
//! memoizes every remote resource in a JSON cache file that survives across
//! runs.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod session;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Park-Atlas operations
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to extract {resource}: {source}")]
    Parse {
        resource: String,
        source: ExtractError,
    },

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("No API key available for nearby-place lookups (set {env_var} or a key file)")]
    MissingApiKey { env_var: String },

    #[error("Unknown state or territory: {0}")]
    UnknownState(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Network retrieval errors
///
/// `target` is always the redacted form of the requested URL, so an API key
/// carried in a query string never reaches logs or terminal output.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {target} failed: {message}")]
    Transport { target: String, message: String },

    #[error("Request to {target} returned HTTP {status}")]
    Status { target: String, status: u16 },

    #[error("Failed to read response body from {target}: {message}")]
    Body { target: String, message: String },
}

/// A fetched page or response lacked an element the extractor requires
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("missing element `{0}`")]
    MissingElement(&'static str),

    #[error("missing attribute `{attr}` on `{element}`")]
    MissingAttribute {
        element: &'static str,
        attr: &'static str,
    },

    #[error("invalid selector `{0}`")]
    Selector(&'static str),

    #[error("element `{0}` has no text")]
    EmptyText(&'static str),

    #[error("invalid link `{href}`: {message}")]
    InvalidLink { href: String, message: String },

    #[error("malformed JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Cache file errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to access cache file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize cache: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for Park-Atlas operations
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Result type alias for extractor operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Coordinator;
pub use model::{NearbyPlace, RawNearbyEntry, SiteRecord, StateDirectory};
pub use storage::CacheStore;
