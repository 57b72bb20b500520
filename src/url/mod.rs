//! URL handling for Park-Atlas
//!
//! This module resolves directory links against the site base, builds the
//! nearby-places query URL, and produces the redacted form of a URL that is
//! safe to log.

use crate::ExtractError;
use url::Url;

/// Query parameter carrying the API key
const KEY_PARAM: &str = "key";

/// Resolves a directory href against the site base URL
///
/// # Examples
///
/// ```
/// use park_atlas::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://www.nps.gov").unwrap();
/// let url = resolve_link(&base, "/state/mi/index.htm").unwrap();
/// assert_eq!(url.as_str(), "https://www.nps.gov/state/mi/index.htm");
/// ```
pub fn resolve_link(base: &Url, href: &str) -> Result<Url, ExtractError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(ExtractError::InvalidLink {
            href: href.to_string(),
            message: "empty href".to_string(),
        });
    }

    let url = base.join(href).map_err(|e| ExtractError::InvalidLink {
        href: href.to_string(),
        message: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ExtractError::InvalidLink {
            href: href.to_string(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url)
}

/// Builds the detail-page URL for a site listed on a state page
///
/// Listing hrefs name the site directory (e.g. `/isro/`); the detail page is
/// `index.htm` inside it.
///
/// # Examples
///
/// ```
/// use park_atlas::url::site_index_url;
/// use url::Url;
///
/// let base = Url::parse("https://www.nps.gov").unwrap();
/// let url = site_index_url(&base, "/isro/").unwrap();
/// assert_eq!(url.as_str(), "https://www.nps.gov/isro/index.htm");
/// ```
pub fn site_index_url(base: &Url, href: &str) -> Result<Url, ExtractError> {
    resolve_link(base, &format!("{}index.htm", href.trim()))
}

/// Parameters of one radius search
#[derive(Debug, Clone, Copy)]
pub struct NearbyQuery<'a> {
    pub origin: &'a str,
    pub radius: u32,
    pub max_matches: u32,
    pub api_key: &'a str,
}

/// Builds the radius-search request URL for a zipcode origin
pub fn nearby_query_url(api_url: &str, query: &NearbyQuery<'_>) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        api_url,
        &[
            ("origin", query.origin),
            ("radius", &query.radius.to_string()),
            ("maxMatches", &query.max_matches.to_string()),
            ("ambiguities", "ignore"),
            ("outFormat", "json"),
            (KEY_PARAM, query.api_key),
        ],
    )
}

/// Returns the URL as a string with any API key value masked
pub fn redact_api_key(url: &Url) -> String {
    if !url.query_pairs().any(|(name, _)| name == KEY_PARAM) {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == KEY_PARAM {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
