use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::{CollectionPatch, ConfigError, SettingKey, SettingValue, SettingsPatch};
use crate::store::state::ModelsPatch;
use crate::store::{ResourceKind, StateSnapshot};

/// Where a resource type is loaded from and which keys to load at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Url template, see [`crate::domain::expand_url`].
    pub base_url: Option<String>,
    pub initial: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory relative load urls are resolved against.
    pub content_root: Option<PathBuf>,
    /// JSON `SET_STATE` payload applied before anything is loaded.
    pub snapshot: Option<PathBuf>,
    pub documents: SourceConfig,
    pub models: SourceConfig,
    pub media: SourceConfig,
    pub settings: BTreeMap<String, SettingValue>,
}

impl AppConfig {
    pub fn source(&self, kind: ResourceKind) -> &SourceConfig {
        match kind {
            ResourceKind::Document => &self.documents,
            ResourceKind::Model => &self.models,
            ResourceKind::Medium => &self.media,
        }
    }

    /// Base urls and settings as a hydration snapshot.
    pub fn initial_snapshot(&self) -> Result<StateSnapshot, ConfigError> {
        let mut settings = SettingsPatch::default();
        for (name, value) in &self.settings {
            let key: SettingKey = name.parse()?;
            settings = settings.with(key, value.clone());
        }

        let patch = |source: &SourceConfig| {
            source
                .base_url
                .as_ref()
                .map(|url| CollectionPatch::base_url(url.clone()))
        };

        Ok(StateSnapshot {
            settings: (!settings.values.is_empty()).then_some(settings),
            document: None,
            documents: patch(&self.documents),
            models: patch(&self.models).map(|collection| ModelsPatch {
                collection,
                scenes: None,
            }),
            media: patch(&self.media),
        })
    }

    /// Reads the configured snapshot file, if any.
    pub fn load_snapshot(&self) -> anyhow::Result<Option<StateSnapshot>> {
        let Some(path) = &self.snapshot else {
            return Ok(None);
        };
        read_snapshot(path).map(Some)
    }

    pub fn content_root(&self) -> PathBuf {
        self.content_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub fn read_snapshot(path: &Path) -> anyhow::Result<StateSnapshot> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

/// Loads the config from its default location, falling back to defaults.
pub fn load_config() -> AppConfig {
    let path = config_path();
    if !path.exists() {
        return AppConfig::default();
    }
    match load_config_from(&path) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Ignoring config at {}: {err}", path.display());
            AppConfig::default()
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("SHOWCASE_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    default_config_path(home::home_dir())
}

/// `.showcase/config.toml` under the home directory, or under the working
/// directory when there is none.
fn default_config_path(home: Option<PathBuf>) -> PathBuf {
    home.unwrap_or_else(|| PathBuf::from("."))
        .join(".showcase")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;
    use crate::store::{Action, Store};
    use tempfile::TempDir;

    const CONFIG: &str = r#"
content_root = "content"

[documents]
base_url = "docs/{key}.html"
initial = ["doc1"]

[models]
base_url = "docs/{document}/models/{key}.json"

[settings]
SET_3D = true
"#;

    #[test]
    fn parses_toml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, CONFIG).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.content_root(), PathBuf::from("content"));
        assert_eq!(config.documents.initial, vec!["doc1".to_string()]);
        assert!(config.media.base_url.is_none());
        assert_eq!(config.settings.get("SET_3D"), Some(&SettingValue::Flag(true)));
    }

    #[test]
    fn initial_snapshot_hydrates_a_store() {
        let config: AppConfig = toml::from_str(CONFIG).unwrap();
        let store = Store::new();
        store.dispatch(Action::set_state(config.initial_snapshot().unwrap()));

        let state = store.state();
        assert!(state.settings.is_enabled(SettingKey::Set3d));
        assert_eq!(state.documents.base_url(), Some("docs/{key}.html"));
        assert_eq!(
            state.models.collection.base_url(),
            Some("docs/{document}/models/{key}.json")
        );
        assert_eq!(state.media.base_url(), None);
        assert_eq!(state.document.status, Status::Uninitialized);
    }

    #[test]
    fn unknown_settings_are_config_errors() {
        let config: AppConfig = toml::from_str("[settings]\nSET_4D = true\n").unwrap();
        assert!(matches!(
            config.initial_snapshot(),
            Err(ConfigError::InvalidSetting(name)) if name == "SET_4D"
        ));
    }

    #[test]
    fn reads_snapshot_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{ "documents": { "keys": ["doc1"], "entries": { "doc1": { "status": "READY" } } } }"#,
        )
        .unwrap();
        let config = AppConfig {
            snapshot: Some(path),
            ..Default::default()
        };

        let snapshot = config.load_snapshot().unwrap().unwrap();
        assert!(snapshot.settings.is_none());
        assert!(snapshot.documents.is_some());
    }

    #[test]
    fn default_config_lives_under_home() {
        assert_eq!(
            default_config_path(Some(PathBuf::from("/home/reader"))),
            PathBuf::from("/home/reader/.showcase/config.toml")
        );
        assert_eq!(
            default_config_path(None),
            PathBuf::from("./.showcase/config.toml")
        );
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[documents\n").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }
}
