use std::sync::Arc;

use crate::domain::ResourceCollection;

use super::super::action::{Action, ResourceKind};
use super::super::state::{ModelsState, SceneState};
use super::collection::reduce_lifecycle;

fn collection(state: &ModelsState) -> &ResourceCollection {
    &state.collection
}

fn collection_mut(state: &mut ModelsState) -> &mut ResourceCollection {
    &mut state.collection
}

/// Reduces the 3D models: the shared lifecycle plus scene locking.
pub fn reduce(mut state: Arc<ModelsState>, action: &Action) -> Arc<ModelsState> {
    match action {
        Action::SetState { state: snapshot } => {
            let Some(patch) = &snapshot.models else {
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
        Action::ShowScene { model_key, key } => {
            if !known_model(&state, model_key) {
                return state;
            }
            let locked = SceneState {
                current: Some(key.clone()),
                free: false,
            };
            if state.scene(model_key) == Some(&locked) {
                return state;
            }
            Arc::make_mut(&mut state)
                .scenes
                .insert(model_key.clone(), locked);
            state
        }
        Action::FreeScene { model_key } => {
            if !known_model(&state, model_key) {
                return state;
            }
            if state.scene(model_key).is_some_and(|scene| scene.free) {
                return state;
            }
            Arc::make_mut(&mut state)
                .scenes
                .entry(model_key.clone())
                .or_default()
                .free = true;
            state
        }
        _ => reduce_lifecycle(
            ResourceKind::Model,
            state,
            action,
            collection,
            collection_mut,
        ),
    }
}

fn known_model(state: &ModelsState, model_key: &str) -> bool {
    if state.collection.contains(model_key) {
        return true;
    }
    log::warn!("Ignoring scene change for unknown model resource: {model_key}");
    false
}
