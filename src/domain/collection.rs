//! Partially normalized collections of documents, models and media.

use super::entry::{ResourceEntry, ResourceKey};
use super::status::Status;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Entries keyed by id plus their registration order and current pointer.
///
/// Every key in `entries` appears exactly once in `keys` and `current`, when
/// set, names an existing entry. Fields are private so every mutation goes
/// through a method that keeps this true, including deserialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CollectionPatch")]
pub struct ResourceCollection {
    keys: Vec<ResourceKey>,
    current: Option<ResourceKey>,
    entries: BTreeMap<ResourceKey, ResourceEntry>,
    base_url: Option<String>,
}

impl ResourceCollection {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    /// Keys in registration order.
    pub fn keys(&self) -> &[ResourceKey] {
        &self.keys
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_entry(&self) -> Option<&ResourceEntry> {
        self.current.as_deref().and_then(|key| self.entry(key))
    }

    pub fn entry(&self, key: &str) -> Option<&ResourceEntry> {
        self.entries.get(key)
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.keys.iter().filter_map(|key| self.entries.get(key))
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Adds an `INITIALIZED` entry for `key`. Returns false if it already exists.
    pub fn register(&mut self, key: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        self.keys.push(key.to_string());
        self.entries
            .insert(key.to_string(), ResourceEntry::registered(key));
        true
    }

    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut ResourceEntry> {
        self.entries.get_mut(key)
    }

    /// Points `current` at an existing entry. Returns false for unknown keys.
    pub fn select(&mut self, key: &str) -> bool {
        if !self.contains(key) {
            return false;
        }
        self.current = Some(key.to_string());
        true
    }

    /// Url to load `entry` from: its own url if it has one, otherwise the
    /// collection's base url template.
    pub fn load_url(&self, entry: &ResourceEntry, context: Option<&str>) -> Option<String> {
        if let Some(url) = &entry.url {
            return Some(url.clone());
        }
        self.base_url
            .as_deref()
            .map(|template| expand_url(template, &entry.key, context))
    }

    /// Shallow merge of a hydration patch.
    ///
    /// Provided fields replace stored ones, entries merge per key. Keys listed
    /// without an entry and a `current` naming a missing entry are dropped.
    pub fn merge(&mut self, patch: CollectionPatch) {
        let CollectionPatch {
            keys,
            current,
            entries,
            base_url,
        } = patch;

        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }

        let mut incoming = entries.unwrap_or_default();
        for key in keys.unwrap_or_default() {
            match incoming.remove(&key) {
                Some(entry) => self.upsert(key, entry),
                None if self.contains(&key) => {}
                None => log::warn!("Dropping key {key} from snapshot: it has no entry"),
            }
        }
        for (key, entry) in incoming {
            self.upsert(key, entry);
        }

        match current {
            Some(Some(key)) if !self.contains(&key) => {
                log::warn!("Ignoring current {key} from snapshot: it has no entry");
            }
            Some(current) => self.current = current,
            None => {}
        }
    }

    fn upsert(&mut self, key: ResourceKey, mut entry: ResourceEntry) {
        if entry.key != key {
            if !entry.key.is_empty() {
                log::warn!("Entry {} stored under {key}; using {key}", entry.key);
            }
            entry.key = key.clone();
        }
        // An entry that exists is at least registered.
        if entry.status == Status::Uninitialized {
            entry.status = Status::Initialized;
        }
        if !self.entries.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.entries.insert(key, entry);
    }
}

impl From<CollectionPatch> for ResourceCollection {
    fn from(patch: CollectionPatch) -> Self {
        let mut collection = Self::default();
        collection.merge(patch);
        collection
    }
}

/// Fills a url template with an entry key and, for models, the owning document.
///
/// `{key}` is replaced by the entry key; a template without it gets the key
/// appended as the last path segment.
pub fn expand_url(template: &str, key: &str, context: Option<&str>) -> String {
    let url = if template.contains("{key}") {
        template.replace("{key}", key)
    } else {
        format!("{}/{}", template.trim_end_matches('/'), key)
    };
    match context {
        Some(document) => url.replace("{document}", document),
        None => url,
    }
}

/// Partial collection carried by a hydration snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<ResourceKey>>,
    #[serde(
        default,
        alias = "selected",
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub current: Option<Option<ResourceKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<BTreeMap<ResourceKey, ResourceEntry>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_url: Option<Option<String>>,
}

impl CollectionPatch {
    pub fn base_url(url: impl Into<String>) -> Self {
        Self {
            base_url: Some(Some(url.into())),
            ..Default::default()
        }
    }
}

/// Distinguishes an explicit `null` (clear the field) from a missing field.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
