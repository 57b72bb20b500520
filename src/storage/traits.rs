//! Namespace dispatch for the cache store
//!
//! Each cacheable resource kind is a zero-sized marker type implementing
//! [`Namespace`], which ties the kind to its value type and to the field of
//! [`CacheStore`] that holds it. The orchestrator is written once against the
//! trait and instantiated per kind.

use crate::storage::CacheStore;
use std::fmt;

/// The four distinct request identities the cache is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Singleton state-name to listing-URL map
    StateDirectory,
    /// Site record keyed by site URL
    SiteDetail,
    /// Ordered site URLs keyed by state listing URL
    StateSiteList,
    /// Raw radius-search entries keyed by zipcode
    NearbyResults,
}

impl ResourceKind {
    /// Name of the namespace in the persisted document
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateDirectory => "stateDirectory",
            Self::SiteDetail => "siteDetails",
            Self::StateSiteList => "stateSiteLists",
            Self::NearbyResults => "nearbyResults",
        }
    }

    /// Name used for the namespace by older cache files
    pub fn legacy_name(&self) -> &'static str {
        match self {
            Self::StateDirectory => "state_websites",
            Self::SiteDetail => "national_sites",
            Self::StateSiteList => "states_called",
            Self::NearbyResults => "zipcodes",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed access to one namespace of a [`CacheStore`]
///
/// `lookup` is an exact key match. `store` creates the namespace on first
/// write and overwrites any existing value for the key. `mapping` exposes the
/// whole namespace, or `None` before its first write.
pub trait Namespace {
    type Value: Clone;

    type Mapping;

    const KIND: ResourceKind;

    fn mapping(cache: &CacheStore) -> Option<&Self::Mapping>;

    fn lookup<'a>(cache: &'a CacheStore, key: &str) -> Option<&'a Self::Value>;

    fn store(cache: &mut CacheStore, key: &str, value: Self::Value);
}
