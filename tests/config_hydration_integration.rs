//! Integration tests for building the initial state from a config file.

use serde_json::json;
use showcase::domain::{SettingKey, Status};
use showcase::infra::app_config::load_config_from;
use showcase::infra::fetch::FileFetcher;
use showcase::store::{Action, ResourceKind, ResourceLoader, Store};
use tempfile::TempDir;

#[tokio::test]
async fn test_config_and_snapshot_build_initial_state() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("content");
    std::fs::create_dir_all(content.join("docs")).unwrap();
    std::fs::write(content.join("docs/intro.html"), "Welcome").unwrap();

    let snapshot = dir.path().join("state.json");
    std::fs::write(
        &snapshot,
        json!({
            "documents": {
                "keys": ["cached"],
                "entries": { "cached": { "status": "READY", "content": { "head": "", "body": "old" } } }
            }
        })
        .to_string(),
    )
    .unwrap();

    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
content_root = "{}"
snapshot = "{}"

[documents]
base_url = "docs/{{key}}.html"
initial = ["intro"]

[settings]
SET_RELATED_IMAGES = true
"#,
            content.display(),
            snapshot.display()
        ),
    )
    .unwrap();

    let config = load_config_from(&config_path).unwrap();
    let store = Store::new();
    store.dispatch(Action::set_state(config.initial_snapshot().unwrap()));
    store.dispatch(Action::set_state(config.load_snapshot().unwrap().unwrap()));

    let fetcher = FileFetcher::new(config.content_root());
    let loader = ResourceLoader::documents();
    for key in &config.source(ResourceKind::Document).initial {
        assert!(loader.ensure_loaded(&store, &fetcher, key).await.is_loaded());
    }

    let state = store.state();
    assert!(state.settings.is_enabled(SettingKey::SetRelatedImages));
    assert_eq!(state.documents.keys(), ["cached".to_string(), "intro".to_string()]);
    assert_eq!(state.documents.entry("cached").unwrap().status, Status::Ready);
    assert_eq!(
        state.documents.entry("intro").unwrap().content,
        Some(json!({ "head": "", "body": "Welcome" }))
    );
}
