//! JSON-file cache store
//!
//! The whole store is one JSON document, read once at session start and
//! written back once at session end. Namespaces are absent until their first
//! write. Presence of a key is the only hit signal; nothing expires.

use crate::model::{RawNearbyEntry, SiteRecord, StateDirectory};
use crate::storage::traits::{Namespace, ResourceKind};
use crate::CacheError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// In-memory cache of every remote resource fetched so far
///
/// The legacy key names (`state_websites`, `national_sites`, `states_called`,
/// `zipcodes`) are accepted on load so older cache files keep working; saving
/// always writes the current names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStore {
    #[serde(rename = "stateDirectory", skip_serializing_if = "Option::is_none")]
    state_directory: Option<StateDirectory>,

    #[serde(rename = "siteDetails", skip_serializing_if = "Option::is_none")]
    site_details: Option<BTreeMap<String, SiteRecord>>,

    #[serde(rename = "stateSiteLists", skip_serializing_if = "Option::is_none")]
    state_site_lists: Option<BTreeMap<String, Vec<String>>>,

    #[serde(rename = "nearbyResults", skip_serializing_if = "Option::is_none")]
    nearby_results: Option<BTreeMap<String, Vec<RawNearbyEntry>>>,
}

impl CacheStore {
    /// Creates an empty store with every namespace absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from `path`, substituting an empty store on any failure
    ///
    /// A missing or unreadable file, or one that is not a JSON object, is
    /// logged and never surfaced to the caller. Within a readable document
    /// each entry is decoded on its own: an entry that does not fit its
    /// namespace is dropped with a warning and the rest are kept.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No cache file at {}, starting empty", path.display());
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Cannot read cache file {}: {}; starting empty",
                    path.display(),
                    e
                );
                return Self::default();
            }
        };

        let document = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(document)) => document,
            Ok(_) => {
                tracing::warn!(
                    "Cache file {} is not a JSON object; starting empty",
                    path.display()
                );
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Cache file {} is malformed: {}; starting empty",
                    path.display(),
                    e
                );
                return Self::default();
            }
        };

        let store = Self::from_document(document);
        tracing::info!(
            "Loaded cache from {} ({} sites, {} state lists, {} nearby results)",
            path.display(),
            store.len(ResourceKind::SiteDetail).unwrap_or(0),
            store.len(ResourceKind::StateSiteList).unwrap_or(0),
            store.len(ResourceKind::NearbyResults).unwrap_or(0),
        );
        store
    }

    fn from_document(mut document: Map<String, Value>) -> Self {
        let state_directory =
            decode_namespace::<String>(&mut document, ResourceKind::StateDirectory).map(
                |entries| {
                    let mut directory = StateDirectory::new();
                    for (name, url) in entries {
                        directory.insert(name, url);
                    }
                    directory
                },
            );

        Self {
            state_directory,
            site_details: decode_namespace(&mut document, ResourceKind::SiteDetail),
            state_site_lists: decode_namespace(&mut document, ResourceKind::StateSiteList),
            nearby_results: decode_namespace(&mut document, ResourceKind::NearbyResults),
        }
    }

    /// Writes the full store to `path`
    ///
    /// The document is written to a sibling temporary file and renamed over
    /// the target, so a failed write leaves the previous file intact.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let content = serde_json::to_string(self)?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);

        std::fs::write(tmp_path, content).map_err(|source| CacheError::Io {
            path: tmp_path.display().to_string(),
            source,
        })?;
        if let Err(source) = std::fs::rename(tmp_path, path) {
            let _ = std::fs::remove_file(tmp_path);
            return Err(CacheError::Io {
                path: path.display().to_string(),
                source,
            });
        }

        tracing::info!("Saved cache to {}", path.display());
        Ok(())
    }

    /// Exact-match lookup in namespace `N`
    pub fn get<N: Namespace>(&self, key: &str) -> Option<&N::Value> {
        N::lookup(self, key)
    }

    /// Stores `value` under `key` in namespace `N`, overwriting any previous value
    pub fn put<N: Namespace>(&mut self, key: &str, value: N::Value) {
        N::store(self, key, value);
    }

    pub fn contains<N: Namespace>(&self, key: &str) -> bool {
        N::lookup(self, key).is_some()
    }

    /// The whole of namespace `N`, or `None` when it is absent
    pub fn namespace<N: Namespace>(&self) -> Option<&N::Mapping> {
        N::mapping(self)
    }

    /// Whether a namespace has been created by a write (or loaded from disk)
    pub fn has_namespace(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::StateDirectory => self.state_directory.is_some(),
            ResourceKind::SiteDetail => self.site_details.is_some(),
            ResourceKind::StateSiteList => self.state_site_lists.is_some(),
            ResourceKind::NearbyResults => self.nearby_results.is_some(),
        }
    }

    /// Number of entries in a namespace, or `None` when it is absent
    pub fn len(&self, kind: ResourceKind) -> Option<usize> {
        match kind {
            ResourceKind::StateDirectory => self.state_directory.as_ref().map(|_| 1),
            ResourceKind::SiteDetail => self.site_details.as_ref().map(BTreeMap::len),
            ResourceKind::StateSiteList => self.state_site_lists.as_ref().map(BTreeMap::len),
            ResourceKind::NearbyResults => self.nearby_results.as_ref().map(BTreeMap::len),
        }
    }

    /// True when no namespace exists
    pub fn is_empty(&self) -> bool {
        self.state_directory.is_none()
            && self.site_details.is_none()
            && self.state_site_lists.is_none()
            && self.nearby_results.is_none()
    }
}

/// Decodes one namespace of a loaded document, entry by entry
///
/// The current name wins over the legacy one. A namespace that is not an
/// object is dropped whole; entries that fail to decode are skipped.
fn decode_namespace<T: DeserializeOwned>(
    document: &mut Map<String, Value>,
    kind: ResourceKind,
) -> Option<BTreeMap<String, T>> {
    let value = document
        .remove(kind.as_str())
        .or_else(|| document.remove(kind.legacy_name()))?;

    let entries = match value {
        Value::Object(entries) => entries,
        other => {
            tracing::warn!(
                "Cached {} namespace is not an object (found {}); dropping it",
                kind,
                json_type(&other)
            );
            return None;
        }
    };

    let mut decoded = BTreeMap::new();
    for (key, entry) in entries {
        match serde_json::from_value::<T>(entry) {
            Ok(value) => {
                decoded.insert(key, value);
            }
            Err(e) => tracing::warn!("Dropping cached {} entry {}: {}", kind, key, e),
        }
    }
    Some(decoded)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The state directory namespace; a singleton, so the key is ignored
pub struct StateDirectories;

impl Namespace for StateDirectories {
    type Value = StateDirectory;
    type Mapping = StateDirectory;
    const KIND: ResourceKind = ResourceKind::StateDirectory;

    fn mapping(cache: &CacheStore) -> Option<&StateDirectory> {
        cache.state_directory.as_ref()
    }

    fn lookup<'a>(cache: &'a CacheStore, _key: &str) -> Option<&'a StateDirectory> {
        cache.state_directory.as_ref()
    }

    fn store(cache: &mut CacheStore, _key: &str, value: StateDirectory) {
        cache.state_directory = Some(value);
    }
}

/// Site records keyed by site URL
pub struct SiteDetails;

impl Namespace for SiteDetails {
    type Value = SiteRecord;
    type Mapping = BTreeMap<String, SiteRecord>;
    const KIND: ResourceKind = ResourceKind::SiteDetail;

    fn mapping(cache: &CacheStore) -> Option<&Self::Mapping> {
        cache.site_details.as_ref()
    }

    fn lookup<'a>(cache: &'a CacheStore, key: &str) -> Option<&'a SiteRecord> {
        cache.site_details.as_ref()?.get(key)
    }

    fn store(cache: &mut CacheStore, key: &str, value: SiteRecord) {
        cache
            .site_details
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value);
    }
}

/// Ordered site URLs keyed by state listing URL
pub struct StateSiteLists;

impl Namespace for StateSiteLists {
    type Value = Vec<String>;
    type Mapping = BTreeMap<String, Vec<String>>;
    const KIND: ResourceKind = ResourceKind::StateSiteList;

    fn mapping(cache: &CacheStore) -> Option<&Self::Mapping> {
        cache.state_site_lists.as_ref()
    }

    fn lookup<'a>(cache: &'a CacheStore, key: &str) -> Option<&'a Vec<String>> {
        cache.state_site_lists.as_ref()?.get(key)
    }

    fn store(cache: &mut CacheStore, key: &str, value: Vec<String>) {
        cache
            .state_site_lists
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value);
    }
}

/// Raw radius-search entries keyed by zipcode
pub struct NearbyResults;

impl Namespace for NearbyResults {
    type Value = Vec<RawNearbyEntry>;
    type Mapping = BTreeMap<String, Vec<RawNearbyEntry>>;
    const KIND: ResourceKind = ResourceKind::NearbyResults;

    fn mapping(cache: &CacheStore) -> Option<&Self::Mapping> {
        cache.nearby_results.as_ref()
    }

    fn lookup<'a>(cache: &'a CacheStore, key: &str) -> Option<&'a Vec<RawNearbyEntry>> {
        cache.nearby_results.as_ref()?.get(key)
    }

    fn store(cache: &mut CacheStore, key: &str, value: Vec<RawNearbyEntry>) {
        cache
            .nearby_results
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawNearbyFields;
    use tempfile::TempDir;

    fn site(name: &str, zipcode: &str) -> SiteRecord {
        SiteRecord {
            category: "National Park".to_string(),
            name: name.to_string(),
            address: "Houghton, MI".to_string(),
            zipcode: zipcode.to_string(),
            phone: "(906) 482-0984".to_string(),
        }
    }

    fn populated_store() -> CacheStore {
        let mut store = CacheStore::new();

        let mut directory = StateDirectory::new();
        directory.insert("michigan", "https://www.nps.gov/state/mi/index.htm");
        store.put::<StateDirectories>("", directory);

        store.put::<SiteDetails>(
            "https://www.nps.gov/isro/index.htm",
            site("Isle Royale", "49931"),
        );
        store.put::<StateSiteLists>(
            "https://www.nps.gov/state/mi/index.htm",
            vec![
                "https://www.nps.gov/kewe/index.htm".to_string(),
                "https://www.nps.gov/isro/index.htm".to_string(),
            ],
        );
        store.put::<NearbyResults>(
            "49931",
            vec![RawNearbyEntry {
                name: "Ranger Bar".to_string(),
                fields: RawNearbyFields {
                    group_sic_code_name: "Bars".to_string(),
                    address: String::new(),
                    city: "Houghton".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            }],
        );

        store
    }

    #[test]
    fn test_new_store_has_no_namespaces() {
        let store = CacheStore::new();
        assert!(store.is_empty());
        for kind in [
            ResourceKind::StateDirectory,
            ResourceKind::SiteDetail,
            ResourceKind::StateSiteList,
            ResourceKind::NearbyResults,
        ] {
            assert!(!store.has_namespace(kind));
            assert_eq!(store.len(kind), None);
        }
        assert!(store.get::<SiteDetails>("https://www.nps.gov/isro/index.htm").is_none());
        assert!(store.get::<StateDirectories>("").is_none());
    }

    #[test]
    fn test_namespace_created_on_first_write() {
        let mut store = CacheStore::new();
        store.put::<SiteDetails>("u1", site("A", "1"));

        assert!(store.has_namespace(ResourceKind::SiteDetail));
        assert!(!store.has_namespace(ResourceKind::StateSiteList));
        assert_eq!(store.len(ResourceKind::SiteDetail), Some(1));
    }

    #[test]
    fn test_get_is_exact_match() {
        let mut store = CacheStore::new();
        store.put::<SiteDetails>("https://www.nps.gov/isro/index.htm", site("A", "1"));

        assert!(store.contains::<SiteDetails>("https://www.nps.gov/isro/index.htm"));
        assert!(!store.contains::<SiteDetails>("https://www.nps.gov/isro/"));
        assert!(!store.contains::<SiteDetails>("HTTPS://WWW.NPS.GOV/isro/index.htm"));
    }

    #[test]
    fn test_put_overwrites() {
        let mut store = CacheStore::new();
        store.put::<SiteDetails>("u1", site("Old", "1"));
        store.put::<SiteDetails>("u1", site("New", "2"));

        assert_eq!(store.get::<SiteDetails>("u1").unwrap().name, "New");
        assert_eq!(store.len(ResourceKind::SiteDetail), Some(1));
    }

    #[test]
    fn test_namespaces_are_independent() {
        let mut store = CacheStore::new();
        store.put::<NearbyResults>("49931", Vec::new());

        assert!(store.contains::<NearbyResults>("49931"));
        assert!(!store.contains::<SiteDetails>("49931"));
        assert!(!store.contains::<StateSiteLists>("49931"));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let store = populated_store();

        store.save(&path).unwrap();
        let loaded = CacheStore::load(&path);

        assert_eq!(loaded, store);
        assert!(!dir.path().join("cache.json.tmp").exists());
    }

    #[test]
    fn test_saved_document_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        populated_store().save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value["stateDirectory"]["michigan"],
            "https://www.nps.gov/state/mi/index.htm"
        );
        assert_eq!(
            value["siteDetails"]["https://www.nps.gov/isro/index.htm"]["zipcode"],
            "49931"
        );
        assert_eq!(
            value["stateSiteLists"]["https://www.nps.gov/state/mi/index.htm"][0],
            "https://www.nps.gov/kewe/index.htm"
        );
        assert_eq!(value["nearbyResults"]["49931"][0]["name"], "Ranger Bar");
    }

    #[test]
    fn test_empty_store_saves_empty_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        CacheStore::new().save(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::load(&dir.path().join("absent.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_empty_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "").unwrap();

        assert!(CacheStore::load(&path).is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{\"siteDetails\": [1, 2").unwrap();

        assert!(CacheStore::load(&path).is_empty());
    }

    #[test]
    fn test_load_directory_path_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(CacheStore::load(dir.path()).is_empty());
    }

    #[test]
    fn test_load_legacy_key_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big_cache.json");
        std::fs::write(
            &path,
            r#"{
                "state_websites": {"michigan": "https://www.nps.gov/state/mi/index.htm"},
                "national_sites": {"https://www.nps.gov/isro/index.htm": {
                    "category": "National Park", "name": "Isle Royale",
                    "address": "Houghton, MI", "zipcode": "49931", "phone": "906"
                }},
                "states_called": {"https://www.nps.gov/state/mi/index.htm": ["https://www.nps.gov/isro/index.htm"]},
                "zipcodes": {"49931": [{"name": "Ranger Bar", "fields": {"group_sic_code_name": "", "address": "", "city": ""}}]}
            }"#,
        )
        .unwrap();

        let store = CacheStore::load(&path);
        assert_eq!(
            store.get::<StateDirectories>("").unwrap().get("michigan"),
            Some("https://www.nps.gov/state/mi/index.htm")
        );
        assert_eq!(
            store
                .get::<SiteDetails>("https://www.nps.gov/isro/index.htm")
                .unwrap()
                .name,
            "Isle Royale"
        );
        assert_eq!(store.len(ResourceKind::StateSiteList), Some(1));
        assert_eq!(store.get::<NearbyResults>("49931").unwrap().len(), 1);
    }

    #[test]
    fn test_load_keeps_good_entries_beside_bad_ones() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(
            &path,
            r#"{
                "stateDirectory": {"michigan": "https://www.nps.gov/state/mi/index.htm", "guam": 7},
                "siteDetails": {
                    "https://www.nps.gov/isro/index.htm": {
                        "category": null, "name": "Isle Royale",
                        "address": "Houghton, MI", "zipcode": "49931", "phone": null
                    },
                    "https://www.nps.gov/kewe/index.htm": 42
                },
                "stateSiteLists": "not a mapping",
                "nearbyResults": {"49931": [{"name": "Ranger Bar", "fields": null}]}
            }"#,
        )
        .unwrap();

        let store = CacheStore::load(&path);

        let directory = store.get::<StateDirectories>("").unwrap();
        assert_eq!(directory.len(), 1);
        assert_eq!(
            directory.get("michigan"),
            Some("https://www.nps.gov/state/mi/index.htm")
        );

        let isro = store
            .get::<SiteDetails>("https://www.nps.gov/isro/index.htm")
            .unwrap();
        assert_eq!(isro.category, "no category");
        assert_eq!(isro.phone, "");
        assert!(!store.contains::<SiteDetails>("https://www.nps.gov/kewe/index.htm"));

        assert!(!store.has_namespace(ResourceKind::StateSiteList));

        let nearby = store.get::<NearbyResults>("49931").unwrap();
        assert_eq!(nearby[0].name, "Ranger Bar");
        assert_eq!(nearby[0].fields, RawNearbyFields::default());
    }

    #[test]
    fn test_load_non_object_document_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(CacheStore::load(&path).is_empty());
    }

    #[test]
    fn test_current_key_wins_over_legacy_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(
            &path,
            r#"{"stateSiteLists": {"new": []}, "states_called": {"old": []}}"#,
        )
        .unwrap();

        let store = CacheStore::load(&path);
        assert!(store.contains::<StateSiteLists>("new"));
        assert!(!store.contains::<StateSiteLists>("old"));
    }

    #[test]
    fn test_namespace_exposes_whole_mapping() {
        let store = populated_store();

        let lists = store.namespace::<StateSiteLists>().unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(
            lists["https://www.nps.gov/state/mi/index.htm"][1],
            "https://www.nps.gov/isro/index.htm"
        );

        let directory = store.namespace::<StateDirectories>().unwrap();
        assert_eq!(directory.names().collect::<Vec<_>>(), vec!["michigan"]);

        let sites: Vec<&str> = store
            .namespace::<SiteDetails>()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(sites, vec!["https://www.nps.gov/isro/index.htm"]);

        assert!(CacheStore::new().namespace::<NearbyResults>().is_none());
    }

    #[test]
    fn test_legacy_nearby_fields_survive_resave() {
        let dir = TempDir::new().unwrap();
        let legacy = dir.path().join("big_cache.json");
        std::fs::write(
            &legacy,
            r#"{"zipcodes": {"49931": [{
                "name": "Ranger Bar",
                "distance": 0.37,
                "shapePoints": [47.12, -88.57],
                "fields": {"group_sic_code_name": "Bars", "address": "", "city": "Houghton", "phone": "906"}
            }]}}"#,
        )
        .unwrap();

        let path = dir.path().join("cache.json");
        CacheStore::load(&legacy).save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let entry = &value["nearbyResults"]["49931"][0];
        assert_eq!(entry["name"], "Ranger Bar");
        assert_eq!(entry["distance"], 0.37);
        assert_eq!(entry["shapePoints"][0], 47.12);
        assert_eq!(entry["fields"]["phone"], "906");
        assert_eq!(entry["fields"]["city"], "Houghton");
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        let result = populated_store().save(&path);

        assert!(matches!(result, Err(CacheError::Io { .. })));
        assert!(!dir.path().join("cache.json.tmp").exists());
        assert!(path.join("occupied").exists());
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/cache.json");

        let result = populated_store().save(&path);
        assert!(matches!(result, Err(CacheError::Io { .. })));
    }
}
