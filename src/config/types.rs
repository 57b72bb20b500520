use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Park-Atlas
///
/// Every section is optional; an empty file yields the defaults that point at
/// the public park service site and the MapQuest radius search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub directory: DirectoryConfig,
    pub nearby: NearbyConfig,
    pub cache: CacheConfig,
    pub http: HttpConfig,
}

/// Upstream parks directory site
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Scheme and host every directory link is resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the main index page holding the state picker
    #[serde(rename = "index-path")]
    pub index_path: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nps.gov".to_string(),
            index_path: "/index.htm".to_string(),
        }
    }
}

/// Nearby-places radius search API
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NearbyConfig {
    /// Endpoint of the radius search
    #[serde(rename = "api-url")]
    pub api_url: String,

    /// Search radius in miles
    pub radius: u32,

    /// Maximum number of matches returned per origin
    #[serde(rename = "max-matches")]
    pub max_matches: u32,

    /// Environment variable holding the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Optional TOML secret file with an `api-key` entry
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<PathBuf>,
}

impl Default for NearbyConfig {
    fn default() -> Self {
        Self {
            api_url: "http://www.mapquestapi.com/search/v2/radius".to_string(),
            radius: 10,
            max_matches: 10,
            api_key_env: "MAPQUEST_API_KEY".to_string(),
            api_key_file: None,
        }
    }
}

/// Persisted cache location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("big_cache.json"),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Total request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("park-atlas/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Shape of the optional secret file
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SecretFile {
    #[serde(rename = "api-key")]
    pub api_key: String,
}
