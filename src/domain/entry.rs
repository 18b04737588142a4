//! Per-instance records tracked inside a resource collection.

use super::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque loaded content of a resource.
pub type Content = serde_json::Value;

/// Invariable key of a document, model or medium (e.g. `denver_train_station`).
pub type ResourceKey = String;

/// A single document, model or medium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    /// Immutable identity of the entry.
    #[serde(default)]
    pub key: ResourceKey,
    #[serde(default)]
    pub status: Status,
    /// Url the content was (or will be) loaded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Human readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// When the content was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

impl ResourceEntry {
    /// A freshly registered entry, nothing loaded yet.
    pub fn registered(key: impl Into<ResourceKey>) -> Self {
        Self {
            key: key.into(),
            status: Status::Initialized,
            url: None,
            content: None,
            name: None,
            received_at: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == Status::Ready
    }
}

/// A loaded document split into its head and body markup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentContent {
    #[serde(default)]
    pub head: String,
    #[serde(default)]
    pub body: String,
}

impl DocumentContent {
    pub fn new(head: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            body: body.into(),
        }
    }

    /// Reads document content back out of an entry's opaque content.
    pub fn from_content(content: &Content) -> Option<Self> {
        serde_json::from_value(content.clone()).ok()
    }

    /// Normalizes fetched content into document shape.
    ///
    /// Raw text becomes the body; objects are kept as long as they carry a
    /// head or body.
    pub fn normalize(content: Content) -> Content {
        match content {
            Content::String(body) => Self::new("", body).into_content(),
            Content::Object(map) if map.contains_key("head") || map.contains_key("body") => {
                Content::Object(map)
            }
            other => Self::new("", other.to_string()).into_content(),
        }
    }

    pub fn into_content(self) -> Content {
        serde_json::json!({ "head": self.head, "body": self.body })
    }
}
