use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{null_as_category, null_as_default, NO_CATEGORY};

/// A national site parsed from its detail page
///
/// Identity is the source URL the record was extracted from, which lives in
/// the cache key rather than in the record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    /// Designation such as "National Park"; `"no category"` when the page has none
    #[serde(default = "default_category", deserialize_with = "null_as_category")]
    pub category: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// City and state, e.g. "Houghton, MI"
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,

    /// Postal code as printed, e.g. "49931" or "82190-0168"
    #[serde(default, deserialize_with = "null_as_default")]
    pub zipcode: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
}

fn default_category() -> String {
    NO_CATEGORY.to_string()
}

impl SiteRecord {
    /// One-line summary used in numbered listings
    pub fn info(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SiteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let category = if self.category.is_empty() {
            NO_CATEGORY
        } else {
            &self.category
        };
        write!(
            f,
            "{} ({}): {} {}",
            self.name, category, self.address, self.zipcode
        )
    }
}

/// Lowercased state or territory name mapped to its listing URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateDirectory(BTreeMap<String, String>);

impl StateDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry; the name is stored exactly as given
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.0.insert(name.into(), url.into());
    }

    /// Exact lookup; callers lowercase user input before asking
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// State names in alphabetical order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
