use std::sync::Arc;

use super::super::action::{Action, ResourceKind};
use super::super::state::DocumentState;
use super::collection::allow_transition;
use crate::domain::{ResourceCollection, Status};

/// Reduces the document being loaded or shown.
///
/// Runs after the documents collection. `documents` is the reduced
/// collection and `accepted` tells whether it applied `action`; lifecycle
/// actions it refused leave the document untouched too. `LOAD_DOCUMENT` for
/// a new key starts tracking that document, receive and erred only apply to
/// the tracked key.
pub fn reduce(
    mut state: Arc<DocumentState>,
    action: &Action,
    documents: &ResourceCollection,
    accepted: bool,
) -> Arc<DocumentState> {
    match action {
        Action::SetState { state: snapshot } => {
            let Some(patch) = &snapshot.document else {
                return state;
            };
            let mut merged = (*state).clone();
            merged.merge(patch.clone());
            if merged == *state {
                state
            } else {
                Arc::new(merged)
            }
        }
        Action::LoadDocument { key, url } => {
            if !accepted {
                return state;
            }
            let url = url.clone().or_else(|| {
                documents
                    .entry(key)
                    .and_then(|entry| documents.load_url(entry, None))
            });
            if state.key.as_deref() != Some(key.as_str()) {
                return Arc::new(DocumentState {
                    key: Some(key.clone()),
                    url,
                    status: Status::Loading,
                    content: None,
                    received_at: None,
                });
            }
            let document = Arc::make_mut(&mut state);
            document.status = Status::Loading;
            if url.is_some() {
                document.url = url;
            }
            state
        }
        Action::ReceiveDocument {
            key,
            content,
            received_at,
        } => {
            if !accepted || !tracks(&state, key, Status::Ready) {
                return state;
            }
            let document = Arc::make_mut(&mut state);
            document.status = Status::Ready;
            document.content = Some(content.clone());
            document.received_at = *received_at;
            state
        }
        Action::DocumentErred { key } => {
            if !accepted || !tracks(&state, key, Status::Error) {
                return state;
            }
            Arc::make_mut(&mut state).status = Status::Error;
            state
        }
        _ => state,
    }
}

fn tracks(state: &DocumentState, key: &str, next: Status) -> bool {
    if state.key.as_deref() != Some(key) {
        log::debug!("Document slice is not tracking {key}");
        return false;
    }
    allow_transition(ResourceKind::Document, key, Some(state.status), next)
}
