use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::{null_as_default, NO_ADDRESS, NO_CATEGORY, NO_CITY};

/// One entry of a radius-search `searchResults` array, as returned by the API
///
/// This is the shape cached under the nearby-results namespace. Absent or
/// null fields read as empty strings. Fields the browser does not display
/// (distance, shape points, ...) are carried in `extra` so a cached entry
/// saves back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNearbyEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: RawNearbyFields,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNearbyFields {
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_sic_code_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A place near a site, with sentinel defaults substituted for empty fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyPlace {
    pub name: String,
    pub category: String,
    pub address: String,
    pub city: String,
}

impl From<&RawNearbyEntry> for NearbyPlace {
    fn from(raw: &RawNearbyEntry) -> Self {
        Self {
            name: raw.name.clone(),
            category: or_sentinel(&raw.fields.group_sic_code_name, NO_CATEGORY),
            address: or_sentinel(&raw.fields.address, NO_ADDRESS),
            city: or_sentinel(&raw.fields.city, NO_CITY),
        }
    }
}

fn or_sentinel(value: &str, sentinel: &str) -> String {
    if value.is_empty() {
        sentinel.to_string()
    } else {
        value.to_string()
    }
}

impl fmt::Display for NearbyPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}, {}",
            self.name, self.category, self.address, self.city
        )
    }
}
