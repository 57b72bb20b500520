//! Fetch-or-cache coordinator
//!
//! This module contains the memoization layer between the browsing session
//! and the network:
//! - One generic `fetch_or_cache` routine shared by every resource kind
//! - Public operations for the state directory, state site lists, site
//!   details, and nearby places
//! - The list-to-detail composition that resolves a state's sites in order
//!
//! A given (kind, key) pair is fetched at most once for as long as the cache
//! store lives. A failed fetch or parse stores nothing, so the next request
//! for the same key retries from scratch.

use crate::config::{resolve_api_key, Config, NearbyConfig};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{
    parse_nearby_place, parse_nearby_results, parse_site_detail, parse_state_directory,
    parse_state_site_list,
};
use crate::model::{NearbyPlace, RawNearbyEntry, SiteRecord, StateDirectory};
use crate::storage::{
    CacheStore, Namespace, NearbyResults, SiteDetails, StateDirectories, StateSiteLists,
};
use crate::url::{nearby_query_url, NearbyQuery};
use crate::{AtlasError, ExtractResult, Result};
use url::Url;

/// Returns the cached value for `key` in namespace `N`, fetching and parsing
/// it on a miss
///
/// `request` is only evaluated on a miss, so resources that need credentials
/// to fetch can still be served from the cache without them.
async fn fetch_or_cache<N, R, P>(
    cache: &mut CacheStore,
    fetcher: &Fetcher,
    key: &str,
    request: R,
    parse: P,
) -> Result<N::Value>
where
    N: Namespace,
    R: FnOnce() -> Result<Url>,
    P: FnOnce(&str) -> ExtractResult<N::Value>,
{
    if let Some(value) = cache.get::<N>(key) {
        tracing::debug!("Cache hit: {} [{}]", N::KIND, key);
        return Ok(value.clone());
    }

    tracing::debug!("Cache miss: {} [{}]", N::KIND, key);
    let url = request()?;
    let body = fetcher.fetch(&url).await?;
    let value = parse(&body).map_err(|source| AtlasError::Parse {
        resource: format!("{} [{}]", N::KIND, key),
        source,
    })?;

    cache.put::<N>(key, value.clone());
    Ok(value)
}

/// Main coordinator structure
///
/// Owns the cache store for the duration of a session. The caller loads the
/// store before construction and saves it after [`Coordinator::into_cache`].
pub struct Coordinator {
    base_url: Url,
    index_url: Url,
    nearby: NearbyConfig,
    api_key: Option<String>,
    fetcher: Fetcher,
    cache: CacheStore,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint configuration
    /// * `fetcher` - Remote fetcher used on cache misses
    /// * `cache` - The store to read from and populate
    /// * `api_key` - Nearby-places API key, if one is available
    pub fn new(
        config: &Config,
        fetcher: Fetcher,
        cache: CacheStore,
        api_key: Option<String>,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.directory.base_url)?;
        let index_url = base_url.join(&config.directory.index_path)?;

        Ok(Self {
            base_url,
            index_url,
            nearby: config.nearby.clone(),
            api_key,
            fetcher,
            cache,
        })
    }

    /// Creates a coordinator with a fetcher and API key derived from `config`
    pub fn from_config(config: &Config, cache: CacheStore) -> Result<Self> {
        let fetcher = Fetcher::new(&config.http)?;
        let api_key = resolve_api_key(&config.nearby)?;
        if api_key.is_none() {
            tracing::warn!(
                "No API key found in ${} or key file; only cached nearby results are available",
                config.nearby.api_key_env
            );
        }
        Self::new(config, fetcher, cache, api_key)
    }

    /// The cache store as it currently stands
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Ends the coordinator's ownership of the cache store
    pub fn into_cache(self) -> CacheStore {
        self.cache
    }

    /// Returns the state directory, fetching the main index page on a miss
    pub async fn state_directory(&mut self) -> Result<StateDirectory> {
        let key = self.index_url.to_string();
        let base = &self.base_url;
        let index = &self.index_url;

        fetch_or_cache::<StateDirectories, _, _>(
            &mut self.cache,
            &self.fetcher,
            &key,
            || Ok(index.clone()),
            |html| parse_state_directory(html, base),
        )
        .await
    }

    /// Lowercased names of every state and territory in the directory
    pub async fn list_states(&mut self) -> Result<Vec<String>> {
        let directory = self.state_directory().await?;
        Ok(directory.names().map(str::to_string).collect())
    }

    /// Looks up the listing URL for an already-lowercased state name
    pub async fn state_url(&mut self, state: &str) -> Result<String> {
        let directory = self.state_directory().await?;
        directory
            .get(state)
            .map(str::to_string)
            .ok_or_else(|| AtlasError::UnknownState(state.to_string()))
    }

    /// Returns the site record for a detail-page URL
    pub async fn site_detail(&mut self, site_url: &str) -> Result<SiteRecord> {
        fetch_or_cache::<SiteDetails, _, _>(
            &mut self.cache,
            &self.fetcher,
            site_url,
            || Ok(Url::parse(site_url)?),
            parse_site_detail,
        )
        .await
    }

    /// Returns the ordered site URLs listed on a state page
    pub async fn state_site_urls(&mut self, state_url: &str) -> Result<Vec<String>> {
        let base = &self.base_url;

        fetch_or_cache::<StateSiteLists, _, _>(
            &mut self.cache,
            &self.fetcher,
            state_url,
            || Ok(Url::parse(state_url)?),
            |html| parse_state_site_list(html, base),
        )
        .await
    }

    /// Resolves every site on a state page to its record, in listing order
    ///
    /// Each detail is looked up independently and one at a time: cached
    /// sites are never refetched even when their siblings miss. The first
    /// failure aborts the listing, keeping whatever was cached before it.
    pub async fn sites_for_state_url(&mut self, state_url: &str) -> Result<Vec<SiteRecord>> {
        let urls = self.state_site_urls(state_url).await?;
        tracing::info!("Resolving {} sites for {}", urls.len(), state_url);

        let mut sites = Vec::with_capacity(urls.len());
        for url in &urls {
            sites.push(self.site_detail(url).await?);
        }
        Ok(sites)
    }

    /// Lists the sites of a state by its lowercased name
    pub async fn list_sites_for_state(&mut self, state: &str) -> Result<Vec<SiteRecord>> {
        let state_url = self.state_url(state).await?;
        self.sites_for_state_url(&state_url).await
    }

    /// Returns the raw radius-search entries around a zipcode
    ///
    /// The API key is only required when the zipcode is not cached.
    pub async fn nearby_results(&mut self, zipcode: &str) -> Result<Vec<RawNearbyEntry>> {
        let nearby = &self.nearby;
        let api_key = self.api_key.as_deref();

        fetch_or_cache::<NearbyResults, _, _>(
            &mut self.cache,
            &self.fetcher,
            zipcode,
            || {
                let api_key = api_key.ok_or_else(|| AtlasError::MissingApiKey {
                    env_var: nearby.api_key_env.clone(),
                })?;
                let query = NearbyQuery {
                    origin: zipcode,
                    radius: nearby.radius,
                    max_matches: nearby.max_matches,
                    api_key,
                };
                Ok(nearby_query_url(&nearby.api_url, &query)?)
            },
            parse_nearby_results,
        )
        .await
    }

    /// Lists places near a site, keyed by the site's zipcode
    pub async fn list_nearby(&mut self, site: &SiteRecord) -> Result<Vec<NearbyPlace>> {
        let entries = self.nearby_results(&site.zipcode).await?;
        Ok(entries.iter().map(parse_nearby_place).collect())
    }
}
