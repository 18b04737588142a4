//! Reducer-style state updates + the loader that drives resource fetches.

pub mod action;
pub mod reducer;
pub mod runtime;
pub mod selectors;
pub mod state;

pub use action::{Action, Lifecycle, ResourceKind};
pub use runtime::{FetchOutcome, ResourceLoader, SkipReason};
pub use state::{DocumentState, ModelsState, RootState, SceneState, StateSnapshot};

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::StoreError;

/// Holds the current root state and applies actions to it one at a time.
///
/// Every reduction runs while the store's lock is held, so readers and
/// subscribers only ever see whole snapshots.
#[derive(Debug)]
pub struct Store {
    state: watch::Sender<Arc<RootState>>,
}

impl Store {
    /// A store holding the default (empty) root state.
    pub fn new() -> Self {
        Self::with_state(RootState::default())
    }

    pub fn with_state(state: RootState) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(state));
        Self { state: tx }
    }

    /// The current snapshot.
    pub fn state(&self) -> Arc<RootState> {
        Arc::clone(&self.state.borrow())
    }

    /// Receives every snapshot that differs from the previous one.
    pub fn subscribe(&self) -> watch::Receiver<Arc<RootState>> {
        self.state.subscribe()
    }

    /// Applies `action`. Returns whether the state changed.
    pub fn dispatch(&self, action: Action) -> bool {
        self.dispatch_with(|_| Some((action, ()))).is_some_and(|(changed, ())| changed)
    }

    /// Decodes a wire action and dispatches it.
    ///
    /// Unknown action types are accepted and ignored; a known type with a
    /// malformed payload is an error. See [`Action::from_wire`].
    pub fn dispatch_json(&self, value: serde_json::Value) -> Result<bool, StoreError> {
        let action = Action::from_wire(value)?;
        if matches!(action, Action::Unrecognized) {
            log::debug!("Ignoring unrecognized action");
            return Ok(false);
        }
        Ok(self.dispatch(action))
    }

    /// Looks at the current state and, if `plan` returns an action, applies
    /// it before anyone else can dispatch.
    ///
    /// This is what lets the loader check a status and mark it loading as one
    /// step. Returns whether the state changed along with the plan's output.
    pub(crate) fn dispatch_with<T, F>(&self, plan: F) -> Option<(bool, T)>
    where
        F: FnOnce(&RootState) -> Option<(Action, T)>,
    {
        let mut outcome = None;
        self.state.send_if_modified(|current| {
            let Some((action, output)) = plan(current) else {
                return false;
            };
            log::debug!("dispatch {}", action.type_name());
            let next = reducer::reduce(current, &action);
            let changed = !Arc::ptr_eq(current, &next);
            *current = next;
            outcome = Some((changed, output));
            changed
        });
        outcome
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SettingKey, Status};
    use serde_json::json;

    #[test]
    fn dispatch_reports_changes() {
        let store = Store::new();
        assert!(store.dispatch(ResourceKind::Document.register("doc1")));
        assert!(!store.dispatch(ResourceKind::Document.register("doc1")));
        assert_eq!(store.state().documents.keys(), ["doc1".to_string()]);
    }

    #[test]
    fn dispatch_json_ignores_unknown_types() {
        let store = Store::new();
        let before = store.state();
        assert!(!store.dispatch_json(json!({ "type": "SHOW_HEADER" })).unwrap());
        assert!(Arc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn dispatch_json_accepts_setting_names_as_types() {
        let store = Store::new();
        assert!(
            store
                .dispatch_json(json!({ "type": "SET_3D", "value": true }))
                .unwrap()
        );
        assert!(store.state().settings.is_enabled(SettingKey::Set3d));
    }

    #[test]
    fn dispatch_json_rejects_malformed_known_types() {
        let store = Store::new();
        assert!(store.dispatch_json(json!({ "type": "REGISTER_DOCUMENT" })).is_err());
    }

    #[test]
    fn dispatch_json_applies_wire_actions() {
        let store = Store::new();
        store
            .dispatch_json(json!({ "type": "SET_SETTING", "name": "SET_3D", "value": true }))
            .unwrap();
        store
            .dispatch_json(json!({ "type": "REGISTER_MODEL", "key": "train" }))
            .unwrap();
        let state = store.state();
        assert!(state.settings.is_enabled(SettingKey::Set3d));
        assert_eq!(
            state.models.collection.entry("train").unwrap().status,
            Status::Initialized
        );
    }

    #[tokio::test]
    async fn subscribers_see_changes_only() {
        let store = Store::new();
        let mut rx = store.subscribe();

        store.dispatch(ResourceKind::Medium.register("m1"));
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert!(seen.media.contains("m1"));

        store.dispatch(ResourceKind::Medium.register("m1"));
        assert!(!rx.has_changed().unwrap());
    }
}
