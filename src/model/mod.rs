//! Record types shared by the extractors, the cache, and the browsing session
//!
//! - `SiteRecord`: one national site from its detail page
//! - `StateDirectory`: state name to listing URL
//! - `RawNearbyEntry` / `NearbyPlace`: nearby-place data before and after
//!   sentinel substitution

mod nearby;
mod site;

use serde::{Deserialize, Deserializer};

pub use nearby::{NearbyPlace, RawNearbyEntry, RawNearbyFields};
pub use site::{SiteRecord, StateDirectory};

/// Placeholder for an empty category
pub const NO_CATEGORY: &str = "no category";

/// Placeholder for an empty nearby-place address
pub const NO_ADDRESS: &str = "no address";

/// Placeholder for an empty nearby-place city
pub const NO_CITY: &str = "no city";

/// Reads `null` as the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads `null` or an empty string as [`NO_CATEGORY`]
pub(crate) fn null_as_category<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|category| !category.is_empty())
        .unwrap_or_else(|| NO_CATEGORY.to_string()))
}
