//! Read-only views over the root state.

use std::sync::Arc;

use serde::Serialize;

use super::state::{ModelsState, RootState};
use crate::domain::{Content, DocumentContent, ResourceCollection, ResourceEntry, Settings, Status};

/// What the site's top-level view is rendered from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteProps {
    pub settings: Arc<Settings>,
    pub documents: Arc<ResourceCollection>,
    pub models: Arc<ModelsState>,
}

pub fn site_props(state: &RootState) -> SiteProps {
    SiteProps {
        settings: Arc::clone(&state.settings),
        documents: Arc::clone(&state.documents),
        models: Arc::clone(&state.models),
    }
}

/// The entry for the document being shown.
///
/// Prefers the document slice's key and falls back to the documents
/// collection's current key.
pub fn current_document(state: &RootState) -> Option<&ResourceEntry> {
    state
        .document
        .key
        .as_deref()
        .and_then(|key| state.documents.entry(key))
        .or_else(|| state.documents.current_entry())
}

/// Head and body of the document being shown, once it is ready.
pub fn document_content(state: &RootState) -> Option<DocumentContent> {
    if state.document.status == Status::Ready {
        if let Some(content) = &state.document.content {
            return DocumentContent::from_content(content);
        }
    }
    current_document(state)
        .filter(|entry| entry.is_ready())
        .and_then(|entry| entry.content.as_ref())
        .and_then(DocumentContent::from_content)
}

/// Reads a value by dotted path, e.g. `documents.entries.doc1.status`.
///
/// Path segments index objects by key and arrays by position. An empty
/// path returns the whole state.
pub fn lookup(state: &RootState, path: &str) -> Option<Content> {
    let root = serde_json::to_value(state).ok()?;
    let path = path.trim();
    if path.is_empty() {
        return Some(root);
    }
    let mut current = &root;
    for segment in path.split('.') {
        current = match current {
            Content::Object(map) => map.get(segment)?,
            Content::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SettingKey;
    use crate::store::{Action, ResourceKind, Store};
    use serde_json::json;

    fn loaded_store() -> Store {
        let store = Store::new();
        store.dispatch(ResourceKind::Document.register("doc1"));
        store.dispatch(ResourceKind::Document.load("doc1", Some("docs/doc1.html".into())));
        store.dispatch(ResourceKind::Document.receive(
            "doc1",
            DocumentContent::new("", "<p>hi</p>").into_content(),
        ));
        store
    }

    #[test]
    fn site_props_share_slices() {
        let store = Store::new();
        store.dispatch(Action::set_setting(SettingKey::Set3d, true));
        let state = store.state();
        let props = site_props(&state);
        assert!(Arc::ptr_eq(&props.settings, &state.settings));
        assert!(Arc::ptr_eq(&props.models, &state.models));
        assert!(props.settings.is_enabled(SettingKey::Set3d));
    }

    #[test]
    fn document_content_once_ready() {
        let store = Store::new();
        store.dispatch(ResourceKind::Document.register("doc1"));
        assert!(document_content(&store.state()).is_none());

        let store = loaded_store();
        let state = store.state();
        assert_eq!(current_document(&state).unwrap().key, "doc1");
        assert_eq!(document_content(&state).unwrap().body, "<p>hi</p>");
    }

    #[test]
    fn current_document_falls_back_to_selected_key() {
        let store = Store::new();
        store.dispatch(ResourceKind::Document.register("doc1"));
        store.dispatch(ResourceKind::Document.register("doc2"));
        store.dispatch(ResourceKind::Document.show("doc2"));
        assert_eq!(current_document(&store.state()).unwrap().key, "doc2");
    }

    #[test]
    fn lookup_walks_dotted_paths() {
        let state = loaded_store().state();
        assert_eq!(
            lookup(&state, "documents.entries.doc1.content.body"),
            Some(json!("<p>hi</p>"))
        );
        assert_eq!(lookup(&state, "documents.keys.0"), Some(json!("doc1")));
        assert_eq!(lookup(&state, "documents.entries.doc1.status"), Some(json!("READY")));
        assert_eq!(lookup(&state, "media.entries.nope"), None);
        assert!(lookup(&state, "").unwrap().is_object());
    }
}
