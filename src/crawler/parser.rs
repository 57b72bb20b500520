//! Record extractors for directory pages and radius-search responses
//!
//! Every function here is a pure transformation of a fetched body into a
//! record. None of them touch the network or the cache, so a markup change
//! upstream only requires changes in this file.
//!
//! # Markup contract
//!
//! | Page | Element |
//! |------|---------|
//! | Main index | `div.SearchBar-keywordSearch li > a[href]` |
//! | State listing | `ul#list_parks li.clearfix h3 a[href]` |
//! | Site detail | `div.Hero-titleContainer a.Hero-title`, `span.Hero-designation`, `span[itemprop=...]` |

use crate::model::{NearbyPlace, RawNearbyEntry, SiteRecord, StateDirectory, NO_CATEGORY};
use crate::url::{resolve_link, site_index_url};
use crate::{ExtractError, ExtractResult};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use url::Url;

fn selector(css: &'static str) -> ExtractResult<Selector> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css))
}

/// Element text with whitespace runs collapsed to single spaces
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn select_first<'a>(
    scope: ElementRef<'a>,
    css: &'static str,
) -> ExtractResult<Option<ElementRef<'a>>> {
    Ok(scope.select(&selector(css)?).next())
}

/// Text of the first `css` match, failing when it is absent or blank
fn required_text(scope: ElementRef<'_>, css: &'static str) -> ExtractResult<String> {
    let element = select_first(scope, css)?.ok_or(ExtractError::MissingElement(css))?;
    let text = element_text(element);
    if text.is_empty() {
        return Err(ExtractError::EmptyText(css));
    }
    Ok(text)
}

/// Parses the main index page into a state directory
///
/// Names are lowercased; URLs are resolved against `base`.
///
/// # Example
///
/// ```
/// use park_atlas::crawler::parse_state_directory;
/// use url::Url;
///
/// let html = r#"<div class="SearchBar-keywordSearch"><ul>
///     <li><a href="/state/mi/index.htm">Michigan</a></li>
/// </ul></div>"#;
/// let base = Url::parse("https://www.nps.gov").unwrap();
/// let directory = parse_state_directory(html, &base).unwrap();
/// assert_eq!(directory.get("michigan"), Some("https://www.nps.gov/state/mi/index.htm"));
/// ```
pub fn parse_state_directory(html: &str, base: &Url) -> ExtractResult<StateDirectory> {
    const CONTAINER: &str = "div.SearchBar-keywordSearch";

    let document = Html::parse_document(html);
    let container = document
        .select(&selector(CONTAINER)?)
        .next()
        .ok_or(ExtractError::MissingElement(CONTAINER))?;

    let item_selector = selector("li")?;
    let mut directory = StateDirectory::new();

    for item in container.select(&item_selector) {
        let anchor = select_first(item, "a")?.ok_or(ExtractError::MissingElement("li > a"))?;
        let href = anchor
            .value()
            .attr("href")
            .ok_or(ExtractError::MissingAttribute {
                element: "li > a",
                attr: "href",
            })?;

        let name = element_text(item).to_lowercase();
        if name.is_empty() {
            return Err(ExtractError::EmptyText("li"));
        }

        let url = resolve_link(base, href)?;
        directory.insert(name, url.to_string());
    }

    if directory.is_empty() {
        return Err(ExtractError::MissingElement("div.SearchBar-keywordSearch li"));
    }

    Ok(directory)
}

/// Parses a state listing page into the ordered detail-page URLs of its sites
///
/// An empty listing is valid and yields an empty sequence.
pub fn parse_state_site_list(html: &str, base: &Url) -> ExtractResult<Vec<String>> {
    const LIST: &str = "ul#list_parks";

    let document = Html::parse_document(html);
    let list = document
        .select(&selector(LIST)?)
        .next()
        .ok_or(ExtractError::MissingElement(LIST))?;

    let item_selector = selector("li.clearfix")?;
    let mut urls = Vec::new();

    for item in list.select(&item_selector) {
        let anchor =
            select_first(item, "h3 a")?.ok_or(ExtractError::MissingElement("li.clearfix h3 a"))?;
        let href = anchor
            .value()
            .attr("href")
            .ok_or(ExtractError::MissingAttribute {
                element: "h3 a",
                attr: "href",
            })?;

        urls.push(site_index_url(base, href)?.to_string());
    }

    Ok(urls)
}

/// Parses a site detail page into a [`SiteRecord`]
///
/// The designation is optional and falls back to `"no category"`. Name,
/// locality, region, postal code, and telephone are required.
pub fn parse_site_detail(html: &str) -> ExtractResult<SiteRecord> {
    const TITLE_CONTAINER: &str = "div.Hero-titleContainer";

    let document = Html::parse_document(html);
    let root = document.root_element();

    let title_container = select_first(root, TITLE_CONTAINER)?
        .ok_or(ExtractError::MissingElement(TITLE_CONTAINER))?;
    let name = required_text(title_container, "a.Hero-title")?;

    let category = select_first(root, "span.Hero-designation")?
        .map(element_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_CATEGORY.to_string());

    let city = required_text(root, r#"span[itemprop="addressLocality"]"#)?;
    let state = required_text(root, r#"span[itemprop="addressRegion"]"#)?;
    let zipcode = required_text(root, r#"span[itemprop="postalCode"]"#)?;
    let phone = required_text(root, r#"span[itemprop="telephone"]"#)?;

    Ok(SiteRecord {
        category,
        name,
        address: format!("{}, {}", city, state),
        zipcode,
        phone,
    })
}

#[derive(Debug, Deserialize)]
struct RadiusResponse {
    #[serde(rename = "searchResults")]
    search_results: Option<Vec<RawNearbyEntry>>,

    #[serde(rename = "resultsCount")]
    results_count: Option<u64>,
}

/// Parses a radius-search JSON response into its raw entries, in API order
///
/// The API omits `searchResults` when nothing matched; that case is accepted
/// only when `resultsCount` is present and zero.
pub fn parse_nearby_results(body: &str) -> ExtractResult<Vec<RawNearbyEntry>> {
    let response: RadiusResponse = serde_json::from_str(body)?;

    match (response.search_results, response.results_count) {
        (Some(entries), _) => Ok(entries),
        (None, Some(0)) => Ok(Vec::new()),
        (None, _) => Err(ExtractError::MissingElement("searchResults")),
    }
}

/// Converts one raw entry into a [`NearbyPlace`] with sentinel defaults
pub fn parse_nearby_place(entry: &RawNearbyEntry) -> NearbyPlace {
    NearbyPlace::from(entry)
}
