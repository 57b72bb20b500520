//! Storage module for persisting fetched resources
//!
//! This module holds the cache store that sits between the remote fetcher and
//! the browsing session:
//! - A JSON document with one namespace per resource kind
//! - Typed per-namespace access through the `Namespace` trait
//! - Soft-failing load and error-propagating save

mod cache;
mod traits;

pub use cache::{CacheStore, NearbyResults, SiteDetails, StateDirectories, StateSiteLists};
pub use traits::{Namespace, ResourceKind};
