use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{Content, ResourceKey, SettingKey, SettingValue};

use super::state::StateSnapshot;

/// Every change to the root state is one of these.
///
/// On the wire an action is a JSON object tagged by `type`
/// (`{"type": "REGISTER_DOCUMENT", "key": "doc1"}`). Types the store does not
/// know decode to [`Action::Unrecognized`], which every reducer ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    /// Hydrate from a full or partial snapshot.
    SetState {
        state: Box<StateSnapshot>,
    },
    SetSetting {
        name: SettingKey,
        value: SettingValue,
    },

    RegisterDocument {
        key: ResourceKey,
    },
    LoadDocument {
        key: ResourceKey,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    ReceiveDocument {
        key: ResourceKey,
        content: Content,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        received_at: Option<DateTime<Utc>>,
    },
    DocumentErred {
        key: ResourceKey,
    },
    ShowDocument {
        key: ResourceKey,
    },

    RegisterModel {
        key: ResourceKey,
    },
    LoadModel {
        key: ResourceKey,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    ReceiveModel {
        key: ResourceKey,
        content: Content,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        received_at: Option<DateTime<Utc>>,
    },
    ModelErred {
        key: ResourceKey,
    },
    #[serde(alias = "CURRENT_MODEL")]
    ShowModel {
        key: ResourceKey,
    },
    /// Lock a model to one of its scenes.
    ShowScene {
        model_key: ResourceKey,
        key: String,
    },
    /// Let a model move freely instead of following the reader's position.
    FreeScene {
        model_key: ResourceKey,
    },

    RegisterMedium {
        key: ResourceKey,
    },
    LoadMedium {
        key: ResourceKey,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    ReceiveMedium {
        key: ResourceKey,
        content: Content,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        received_at: Option<DateTime<Utc>>,
    },
    MediumErred {
        key: ResourceKey,
    },
    #[serde(alias = "SELECTED_MEDIUM")]
    ShowMedium {
        key: ResourceKey,
    },

    #[serde(other)]
    Unrecognized,
}

/// The resource types that share the register/load/receive/erred lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Document,
    Model,
    Medium,
}

impl ResourceKind {
    /// Name of the root state slice holding this kind.
    pub fn slice(self) -> &'static str {
        match self {
            Self::Document => "documents",
            Self::Model => "models",
            Self::Medium => "media",
        }
    }

    pub fn register(self, key: impl Into<ResourceKey>) -> Action {
        let key = key.into();
        match self {
            Self::Document => Action::RegisterDocument { key },
            Self::Model => Action::RegisterModel { key },
            Self::Medium => Action::RegisterMedium { key },
        }
    }

    pub fn load(self, key: impl Into<ResourceKey>, url: Option<String>) -> Action {
        let key = key.into();
        match self {
            Self::Document => Action::LoadDocument { key, url },
            Self::Model => Action::LoadModel { key, url },
            Self::Medium => Action::LoadMedium { key, url },
        }
    }

    /// Stamps the content with the time it was received.
    pub fn receive(self, key: impl Into<ResourceKey>, content: Content) -> Action {
        let key = key.into();
        let received_at = Some(Utc::now());
        match self {
            Self::Document => Action::ReceiveDocument {
                key,
                content,
                received_at,
            },
            Self::Model => Action::ReceiveModel {
                key,
                content,
                received_at,
            },
            Self::Medium => Action::ReceiveMedium {
                key,
                content,
                received_at,
            },
        }
    }

    pub fn erred(self, key: impl Into<ResourceKey>) -> Action {
        let key = key.into();
        match self {
            Self::Document => Action::DocumentErred { key },
            Self::Model => Action::ModelErred { key },
            Self::Medium => Action::MediumErred { key },
        }
    }

    pub fn show(self, key: impl Into<ResourceKey>) -> Action {
        let key = key.into();
        match self {
            Self::Document => Action::ShowDocument { key },
            Self::Model => Action::ShowModel { key },
            Self::Medium => Action::ShowMedium { key },
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::Model => write!(f, "model"),
            Self::Medium => write!(f, "medium"),
        }
    }
}

/// Borrowed view of a lifecycle action, independent of its resource kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lifecycle<'a> {
    Register {
        key: &'a str,
    },
    Load {
        key: &'a str,
        url: Option<&'a str>,
    },
    Receive {
        key: &'a str,
        content: &'a Content,
        received_at: Option<DateTime<Utc>>,
    },
    Erred {
        key: &'a str,
    },
    Show {
        key: &'a str,
    },
}

impl Lifecycle<'_> {
    pub fn key(&self) -> &str {
        match self {
            Self::Register { key }
            | Self::Load { key, .. }
            | Self::Receive { key, .. }
            | Self::Erred { key }
            | Self::Show { key } => key,
        }
    }
}

impl Action {
    pub fn set_state(snapshot: StateSnapshot) -> Self {
        Self::SetState {
            state: Box::new(snapshot),
        }
    }

    pub fn set_setting(name: SettingKey, value: impl Into<SettingValue>) -> Self {
        Self::SetSetting {
            name,
            value: value.into(),
        }
    }

    pub fn show_scene(model_key: impl Into<ResourceKey>, key: impl Into<String>) -> Self {
        Self::ShowScene {
            model_key: model_key.into(),
            key: key.into(),
        }
    }

    pub fn free_scene(model_key: impl Into<ResourceKey>) -> Self {
        Self::FreeScene {
            model_key: model_key.into(),
        }
    }

    /// Decodes a wire action.
    ///
    /// Besides the tagged forms, a setting name used as the `type`
    /// (`{"type": "SET_3D", "value": true}`) decodes to [`Action::SetSetting`].
    pub fn from_wire(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let setting = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .and_then(|name| SettingKey::ALL.into_iter().find(|key| key.as_str() == name));
        let Some(name) = setting else {
            return serde_json::from_value(value);
        };
        let value = value
            .get("value")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        Ok(Self::SetSetting {
            name,
            value: serde_json::from_value(value)?,
        })
    }

    /// Classifies resource lifecycle actions by kind.
    pub fn lifecycle(&self) -> Option<(ResourceKind, Lifecycle<'_>)> {
        use ResourceKind::{Document, Medium, Model};

        let classified = match self {
            Self::RegisterDocument { key } => (Document, Lifecycle::Register { key }),
            Self::RegisterModel { key } => (Model, Lifecycle::Register { key }),
            Self::RegisterMedium { key } => (Medium, Lifecycle::Register { key }),

            Self::LoadDocument { key, url } => (
                Document,
                Lifecycle::Load {
                    key,
                    url: url.as_deref(),
                },
            ),
            Self::LoadModel { key, url } => (
                Model,
                Lifecycle::Load {
                    key,
                    url: url.as_deref(),
                },
            ),
            Self::LoadMedium { key, url } => (
                Medium,
                Lifecycle::Load {
                    key,
                    url: url.as_deref(),
                },
            ),

            Self::ReceiveDocument {
                key,
                content,
                received_at,
            } => (
                Document,
                Lifecycle::Receive {
                    key,
                    content,
                    received_at: *received_at,
                },
            ),
            Self::ReceiveModel {
                key,
                content,
                received_at,
            } => (
                Model,
                Lifecycle::Receive {
                    key,
                    content,
                    received_at: *received_at,
                },
            ),
            Self::ReceiveMedium {
                key,
                content,
                received_at,
            } => (
                Medium,
                Lifecycle::Receive {
                    key,
                    content,
                    received_at: *received_at,
                },
            ),

            Self::DocumentErred { key } => (Document, Lifecycle::Erred { key }),
            Self::ModelErred { key } => (Model, Lifecycle::Erred { key }),
            Self::MediumErred { key } => (Medium, Lifecycle::Erred { key }),

            Self::ShowDocument { key } => (Document, Lifecycle::Show { key }),
            Self::ShowModel { key } => (Model, Lifecycle::Show { key }),
            Self::ShowMedium { key } => (Medium, Lifecycle::Show { key }),

            Self::SetState { .. }
            | Self::SetSetting { .. }
            | Self::ShowScene { .. }
            | Self::FreeScene { .. }
            | Self::Unrecognized => return None,
        };
        Some(classified)
    }

    /// The wire `type` of this action, for logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SetState { .. } => "SET_STATE",
            Self::SetSetting { .. } => "SET_SETTING",
            Self::RegisterDocument { .. } => "REGISTER_DOCUMENT",
            Self::LoadDocument { .. } => "LOAD_DOCUMENT",
            Self::ReceiveDocument { .. } => "RECEIVE_DOCUMENT",
            Self::DocumentErred { .. } => "DOCUMENT_ERRED",
            Self::ShowDocument { .. } => "SHOW_DOCUMENT",
            Self::RegisterModel { .. } => "REGISTER_MODEL",
            Self::LoadModel { .. } => "LOAD_MODEL",
            Self::ReceiveModel { .. } => "RECEIVE_MODEL",
            Self::ModelErred { .. } => "MODEL_ERRED",
            Self::ShowModel { .. } => "SHOW_MODEL",
            Self::ShowScene { .. } => "SHOW_SCENE",
            Self::FreeScene { .. } => "FREE_SCENE",
            Self::RegisterMedium { .. } => "REGISTER_MEDIUM",
            Self::LoadMedium { .. } => "LOAD_MEDIUM",
            Self::ReceiveMedium { .. } => "RECEIVE_MEDIUM",
            Self::MediumErred { .. } => "MEDIUM_ERRED",
            Self::ShowMedium { .. } => "SHOW_MEDIUM",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn actions_use_wire_type_names() {
        let action = ResourceKind::Document.register("doc1");
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({ "type": "REGISTER_DOCUMENT", "key": "doc1" })
        );

        let action = ResourceKind::Medium.erred("m1");
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({ "type": "MEDIUM_ERRED", "key": "m1" })
        );
        assert_eq!(action.type_name(), "MEDIUM_ERRED");
    }

    #[test]
    fn decodes_camel_case_fields() {
        let action: Action =
            serde_json::from_value(json!({ "type": "SHOW_SCENE", "modelKey": "train", "key": "platform" }))
                .unwrap();
        assert_eq!(action, Action::show_scene("train", "platform"));
    }

    #[test]
    fn decodes_legacy_aliases() {
        let action: Action =
            serde_json::from_value(json!({ "type": "SELECTED_MEDIUM", "key": "m1" })).unwrap();
        assert_eq!(action, ResourceKind::Medium.show("m1"));
    }

    #[test]
    fn setting_names_decode_as_set_setting() {
        let action = Action::from_wire(json!({ "type": "SET_3D", "value": true })).unwrap();
        assert_eq!(action, Action::set_setting(SettingKey::Set3d, true));

        let action =
            Action::from_wire(json!({ "type": "SET_RELATED_IMAGES", "value": "all" })).unwrap();
        assert_eq!(
            action,
            Action::set_setting(SettingKey::SetRelatedImages, SettingValue::Text("all".into()))
        );

        assert!(Action::from_wire(json!({ "type": "SET_3D" })).is_err());
        assert_eq!(
            Action::from_wire(json!({ "type": "SET_4D", "value": true })).unwrap(),
            Action::Unrecognized
        );
    }

    #[test]
    fn unknown_types_decode_to_unrecognized() {
        let action: Action = serde_json::from_value(json!({ "type": "SHOW_HEADER" })).unwrap();
        assert_eq!(action, Action::Unrecognized);
        assert!(action.lifecycle().is_none());
    }

    #[test]
    fn lifecycle_classifies_by_kind() {
        let action = ResourceKind::Model.load("train", Some("models/train".into()));
        let (kind, lifecycle) = action.lifecycle().unwrap();
        assert_eq!(kind, ResourceKind::Model);
        assert_eq!(
            lifecycle,
            Lifecycle::Load {
                key: "train",
                url: Some("models/train")
            }
        );
        assert_eq!(lifecycle.key(), "train");
    }

    #[test]
    fn receive_stamps_time() {
        let action = ResourceKind::Document.receive("doc1", json!({ "body": "x" }));
        let Some((_, Lifecycle::Receive { received_at, .. })) = action.lifecycle() else {
            panic!("expected receive");
        };
        assert!(received_at.is_some());
    }
}
