mod collection;
pub mod document;
pub mod documents;
pub mod media;
pub mod models;
pub mod settings;

use std::sync::Arc;

use super::action::Action;
use super::state::RootState;

/// Folds `action` into every slice.
///
/// Returns `state` itself when no slice changed, otherwise a new root that
/// shares the untouched slices.
pub fn reduce(state: &Arc<RootState>, action: &Action) -> Arc<RootState> {
    let documents = documents::reduce(Arc::clone(&state.documents), action);
    let accepted = !Arc::ptr_eq(&state.documents, &documents);
    let next = RootState {
        settings: settings::reduce(Arc::clone(&state.settings), action),
        document: document::reduce(Arc::clone(&state.document), action, &documents, accepted),
        documents,
        models: models::reduce(Arc::clone(&state.models), action),
        media: media::reduce(Arc::clone(&state.media), action),
    };
    if next.same_slices(state) {
        Arc::clone(state)
    } else {
        Arc::new(next)
    }
}
