//! Lifecycle reduction shared by every resource collection.

use std::sync::Arc;

use crate::domain::{
    CollectionPatch, InvalidTransitionError, ResourceCollection, Status, UnknownResourceError,
};

use super::super::action::{Action, Lifecycle, ResourceKind};

/// Folds the lifecycle actions of `kind` into the collection reached through
/// `get`/`get_mut`. Anything else, or anything that would not change the
/// collection, returns `state` as is.
pub(super) fn reduce_lifecycle<S: Clone>(
    kind: ResourceKind,
    mut state: Arc<S>,
    action: &Action,
    get: fn(&S) -> &ResourceCollection,
    get_mut: fn(&mut S) -> &mut ResourceCollection,
) -> Arc<S> {
    let Some((action_kind, lifecycle)) = action.lifecycle() else {
        return state;
    };
    if action_kind != kind || !accepts(kind, get(&state), &lifecycle) {
        return state;
    }
    apply(get_mut(Arc::make_mut(&mut state)), lifecycle);
    state
}

/// Shallow-merges a hydration patch, keeping the pointer when nothing changes.
pub(super) fn merge_patch(
    state: Arc<ResourceCollection>,
    patch: Option<&CollectionPatch>,
) -> Arc<ResourceCollection> {
    let Some(patch) = patch else {
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

pub(super) fn identity(collection: &ResourceCollection) -> &ResourceCollection {
    collection
}

pub(super) fn identity_mut(collection: &mut ResourceCollection) -> &mut ResourceCollection {
    collection
}

/// Checks a lifecycle status change for `key`, logging why it is refused.
pub(super) fn allow_transition(
    kind: ResourceKind,
    key: &str,
    current: Option<Status>,
    next: Status,
) -> bool {
    let Some(current) = current else {
        let err = UnknownResourceError {
            kind: kind.to_string(),
            key: key.to_string(),
        };
        log::warn!("Ignoring {next} for {err}");
        return false;
    };
    if !current.can_transition_to(next) {
        let err = InvalidTransitionError {
            key: key.to_string(),
            current: current.to_string(),
            next: next.to_string(),
        };
        log::warn!("Ignoring {kind} action: {err}");
        return false;
    }
    true
}

fn accepts(kind: ResourceKind, collection: &ResourceCollection, lifecycle: &Lifecycle<'_>) -> bool {
    let status_of = |key: &str| collection.entry(key).map(|entry| entry.status);
    match *lifecycle {
        Lifecycle::Register { key } => !collection.contains(key),
        Lifecycle::Show { key } => {
            if collection.current() == Some(key) {
                return false;
            }
            if !collection.contains(key) {
                log::warn!("Ignoring show for unknown {kind} resource: {key}");
                return false;
            }
            true
        }
        Lifecycle::Load { key, .. } => allow_transition(kind, key, status_of(key), Status::Loading),
        Lifecycle::Receive { key, .. } => allow_transition(kind, key, status_of(key), Status::Ready),
        Lifecycle::Erred { key } => allow_transition(kind, key, status_of(key), Status::Error),
    }
}

fn apply(collection: &mut ResourceCollection, lifecycle: Lifecycle<'_>) {
    match lifecycle {
        Lifecycle::Register { key } => {
            collection.register(key);
        }
        Lifecycle::Show { key } => {
            collection.select(key);
        }
        Lifecycle::Load { key, url } => {
            if let Some(entry) = collection.entry_mut(key) {
                entry.status = Status::Loading;
                if let Some(url) = url {
                    entry.url = Some(url.to_string());
                }
            }
        }
        Lifecycle::Receive {
            key,
            content,
            received_at,
        } => {
            if let Some(entry) = collection.entry_mut(key) {
                entry.status = Status::Ready;
                entry.content = Some(content.clone());
                entry.received_at = received_at;
            }
        }
        Lifecycle::Erred { key } => {
            if let Some(entry) = collection.entry_mut(key) {
                entry.status = Status::Error;
            }
        }
    }
}
