use std::sync::Arc;

use crate::domain::ResourceCollection;

use super::super::action::{Action, ResourceKind};
use super::collection::{identity, identity_mut, merge_patch, reduce_lifecycle};

/// Reduces the documents collection.
///
/// Registration appends to `keys`, load/receive/erred move one entry through
/// its lifecycle and `SHOW_DOCUMENT` moves the `current` pointer.
pub fn reduce(state: Arc<ResourceCollection>, action: &Action) -> Arc<ResourceCollection> {
    match action {
        Action::SetState { state: snapshot } => merge_patch(state, snapshot.documents.as_ref()),
        _ => reduce_lifecycle(ResourceKind::Document, state, action, identity, identity_mut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentContent, Status};
    use serde_json::json;

    fn docs() -> Arc<ResourceCollection> {
        Arc::new(ResourceCollection::default())
    }

    #[test]
    fn register_load_receive_scenario() {
        let state = reduce(docs(), &ResourceKind::Document.register("doc1"));
        assert_eq!(state.keys(), ["doc1".to_string()]);
        assert_eq!(state.entry("doc1").unwrap().status, Status::Initialized);

        let state = reduce(state, &ResourceKind::Document.load("doc1", None));
        assert_eq!(state.entry("doc1").unwrap().status, Status::Loading);

        let content = json!({ "head": "", "body": "<p>hi</p>" });
        let state = reduce(state, &ResourceKind::Document.receive("doc1", content));
        let entry = state.entry("doc1").unwrap();
        assert_eq!(entry.status, Status::Ready);
        let doc = DocumentContent::from_content(entry.content.as_ref().unwrap()).unwrap();
        assert_eq!(doc.body, "<p>hi</p>");
        assert!(entry.received_at.is_some());
    }

    #[test]
    fn register_twice_returns_same_state() {
        let once = reduce(docs(), &ResourceKind::Document.register("doc1"));
        let twice = reduce(once.clone(), &ResourceKind::Document.register("doc1"));
        assert!(Arc::ptr_eq(&once, &twice));
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn reduction_does_not_mutate_shared_input() {
        let before = reduce(docs(), &ResourceKind::Document.register("doc1"));
        let after = reduce(before.clone(), &ResourceKind::Document.load("doc1", None));
        assert_eq!(before.entry("doc1").unwrap().status, Status::Initialized);
        assert_eq!(after.entry("doc1").unwrap().status, Status::Loading);
    }

    #[test]
    fn load_records_url() {
        let state = reduce(docs(), &ResourceKind::Document.register("doc1"));
        let state = reduce(
            state,
            &ResourceKind::Document.load("doc1", Some("https://docs.example/doc1".into())),
        );
        assert_eq!(
            state.entry("doc1").unwrap().url.as_deref(),
            Some("https://docs.example/doc1")
        );
    }

    #[test]
    fn ready_and_error_are_not_reachable_from_initialized() {
        let state = reduce(docs(), &ResourceKind::Document.register("doc1"));
        let received = reduce(state.clone(), &ResourceKind::Document.receive("doc1", json!("x")));
        let erred = reduce(state.clone(), &ResourceKind::Document.erred("doc1"));
        assert!(Arc::ptr_eq(&state, &received));
        assert!(Arc::ptr_eq(&state, &erred));
    }

    #[test]
    fn erred_document_can_be_loaded_again() {
        let state = reduce(docs(), &ResourceKind::Document.register("doc1"));
        let state = reduce(state, &ResourceKind::Document.load("doc1", None));
        let state = reduce(state, &ResourceKind::Document.erred("doc1"));
        assert_eq!(state.entry("doc1").unwrap().status, Status::Error);

        let state = reduce(state, &ResourceKind::Document.load("doc1", None));
        assert_eq!(state.entry("doc1").unwrap().status, Status::Loading);
    }

    #[test]
    fn lifecycle_for_unknown_key_is_a_no_op() {
        let state = docs();
        for action in [
            ResourceKind::Document.load("ghost", None),
            ResourceKind::Document.receive("ghost", json!("x")),
            ResourceKind::Document.erred("ghost"),
            ResourceKind::Document.show("ghost"),
        ] {
            assert!(Arc::ptr_eq(&state, &reduce(state.clone(), &action)));
        }
    }

    #[test]
    fn other_kinds_are_ignored() {
        let state = docs();
        let next = reduce(state.clone(), &ResourceKind::Model.register("train"));
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn show_moves_current_without_touching_entries() {
        let state = reduce(docs(), &ResourceKind::Document.register("doc1"));
        let state = reduce(state, &ResourceKind::Document.register("doc2"));
        let state = reduce(state, &ResourceKind::Document.show("doc2"));
        assert_eq!(state.current(), Some("doc2"));

        let state = reduce(state, &ResourceKind::Document.load("doc1", None));
        assert_eq!(state.current(), Some("doc2"));
    }
}
