use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{
    CollectionPatch, Content, ResourceCollection, ResourceKey, Settings, SettingsPatch, Status,
    double_option,
};

/// The whole tree. Each slice is owned by exactly one reducer.
///
/// Slices sit behind `Arc` so snapshots share whatever an action did not
/// touch, and a reduction that changes nothing hands back the same pointer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RootState {
    pub settings: Arc<Settings>,
    pub document: Arc<DocumentState>,
    pub documents: Arc<ResourceCollection>,
    pub models: Arc<ModelsState>,
    pub media: Arc<ResourceCollection>,
}

impl RootState {
    /// True when both snapshots share every slice.
    pub fn same_slices(&self, other: &RootState) -> bool {
        Arc::ptr_eq(&self.settings, &other.settings)
            && Arc::ptr_eq(&self.document, &other.document)
            && Arc::ptr_eq(&self.documents, &other.documents)
            && Arc::ptr_eq(&self.models, &other.models)
            && Arc::ptr_eq(&self.media, &other.media)
    }
}

/// The document currently being loaded or shown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<ResourceKey>,
    /// Url of a publicly available document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

impl DocumentState {
    pub fn merge(&mut self, patch: DocumentPatch) {
        let DocumentPatch {
            key,
            url,
            status,
            content,
            received_at,
        } = patch;
        if let Some(key) = key {
            self.key = key;
        }
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(content) = content {
            self.content = content;
        }
        if let Some(received_at) = received_at {
            self.received_at = received_at;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<Option<ResourceKey>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Option<Content>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub received_at: Option<Option<DateTime<Utc>>>,
}

/// Scene a model is showing and whether it follows the reader.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    /// When set the model stays where it is instead of changing scenes.
    pub free: bool,
}

/// Models collection plus per-model scene state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelsState {
    #[serde(flatten)]
    pub collection: ResourceCollection,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scenes: BTreeMap<ResourceKey, SceneState>,
}

impl ModelsState {
    pub fn scene(&self, model_key: &str) -> Option<&SceneState> {
        self.scenes.get(model_key)
    }

    pub fn merge(&mut self, patch: ModelsPatch) {
        let ModelsPatch { collection, scenes } = patch;
        self.collection.merge(collection);
        for (key, scene) in scenes.unwrap_or_default() {
            if self.collection.contains(&key) {
                self.scenes.insert(key, scene);
            } else {
                log::warn!("Ignoring scene for unknown model {key} from snapshot");
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelsPatch {
    #[serde(flatten)]
    pub collection: CollectionPatch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenes: Option<BTreeMap<ResourceKey, SceneState>>,
}

/// Full or partial root state carried by `SET_STATE`.
///
/// Slices that are absent are left untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<CollectionPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<ModelsPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<CollectionPatch>,
}

impl StateSnapshot {
    pub fn is_empty(&self) -> bool {
        self.settings.is_none()
            && self.document.is_none()
            && self.documents.is_none()
            && self.models.is_none()
            && self.media.is_none()
    }
}

impl From<&RootState> for StateSnapshot {
    /// A snapshot that restores `state` when merged into an empty store.
    fn from(state: &RootState) -> Self {
        let to_patch = |collection: &ResourceCollection| CollectionPatch {
            keys: Some(collection.keys().to_vec()),
            current: Some(collection.current().map(str::to_string)),
            entries: Some(
                collection
                    .entries()
                    .map(|entry| (entry.key.clone(), entry.clone()))
                    .collect(),
            ),
            base_url: Some(collection.base_url().map(str::to_string)),
        };

        Self {
            settings: Some(SettingsPatch {
                values: state
                    .settings
                    .iter()
                    .map(|(key, value)| (key.as_str().to_string(), value.clone()))
                    .collect(),
            }),
            document: Some(DocumentPatch {
                key: Some(state.document.key.clone()),
                url: Some(state.document.url.clone()),
                status: Some(state.document.status),
                content: Some(state.document.content.clone()),
                received_at: Some(state.document.received_at),
            }),
            documents: Some(to_patch(&state.documents)),
            models: Some(ModelsPatch {
                collection: to_patch(&state.models.collection),
                scenes: Some(state.models.scenes.clone()),
            }),
            media: Some(to_patch(&state.media)),
        }
    }
}
