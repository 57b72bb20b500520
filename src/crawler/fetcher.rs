//! HTTP fetcher implementation
//!
//! This module performs the raw network retrieval for every resource kind:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests returning the response body as text
//! - Error classification into `FetchError`
//!
//! There is no retry logic and no caching here. A transport failure or a
//! non-2xx status surfaces immediately to the caller.

use crate::config::HttpConfig;
use crate::url::redact_api_key;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use park_atlas::config::HttpConfig;
/// use park_atlas::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Stateless remote fetcher
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and returns the body text
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Connection refused, DNS, TLS, timeout | `FetchError::Transport` |
    /// | Any non-2xx status | `FetchError::Status` |
    /// | Body could not be read or decoded | `FetchError::Body` |
    ///
    /// Error targets carry the redacted URL.
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let target = redact_api_key(url);
        tracing::info!("Fetching {}", target);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                target: target.clone(),
                message: describe(&e),
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} returned HTTP {}", target, status.as_u16());
            return Err(FetchError::Status {
                target,
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            target,
            message: describe(&e),
        })
    }
}

/// Describes a client error without its URL, which may carry the API key
fn describe(e: &reqwest::Error) -> String {
    let kind = if e.is_timeout() {
        "request timeout"
    } else if e.is_connect() {
        "connection failed"
    } else if e.is_redirect() {
        "redirect error"
    } else if e.is_decode() {
        "decode error"
    } else {
        "request failed"
    };

    match std::error::Error::source(e) {
        Some(source) => format!("{}: {}", kind, source),
        None => kind.to_string(),
    }
}
