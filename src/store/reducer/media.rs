use std::sync::Arc;

use crate::domain::ResourceCollection;

use super::super::action::{Action, ResourceKind};
use super::collection::{identity, identity_mut, merge_patch, reduce_lifecycle};

/// Reduces the media collection. `SHOW_MEDIUM` selects a medium.
pub fn reduce(state: Arc<ResourceCollection>, action: &Action) -> Arc<ResourceCollection> {
    match action {
        Action::SetState { state: snapshot } => merge_patch(state, snapshot.media.as_ref()),
        _ => reduce_lifecycle(ResourceKind::Medium, state, action, identity, identity_mut),
    }
}
