//! Fetch-if-needed orchestration shared by documents, models and media.
//!
//! A [`ResourceLoader`] is a value describing one resource type: where its
//! collection lives in the root state, how to build a load url and which
//! actions mark the load, the received content and a failure. The fetch
//! itself is delegated to a [`Fetcher`].


use std::fmt;

use crate::domain::{
    Content, DocumentContent, FetchError, ResourceCollection, ResourceEntry, Status,
};
use crate::infra::fetch::Fetcher;

use super::Store;
use super::action::{Action, ResourceKind};
use super::state::RootState;

/// Finds the collection a loader governs, optionally within a context such
/// as the document that owns a model.
pub type Resolver =
    for<'a> fn(&'a RootState, Option<&str>) -> Option<&'a ResourceCollection>;

/// Builds the url an entry is fetched from.
pub type UrlBuilder = fn(&ResourceCollection, &ResourceEntry, Option<&str>) -> Option<String>;

/// Why `fetch_if_needed` did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The collection (or its owning context) is not in the state.
    Unresolved,
    /// No entry has been registered under the key.
    Unregistered,
    /// A fetch for the key is already running.
    InFlight,
    /// The content is already there.
    AlreadyLoaded,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved => write!(f, "unresolved"),
            Self::Unregistered => write!(f, "unregistered"),
            Self::InFlight => write!(f, "in flight"),
            Self::AlreadyLoaded => write!(f, "already loaded"),
        }
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    /// Nothing was dispatched.
    Skipped(SkipReason),
    /// The content was received and stored.
    Loaded,
    /// The content arrived but the entry had left `LOADING` meanwhile, e.g.
    /// through a `SET_STATE`, so the store refused it.
    Discarded,
    /// The entry was parked in `ERROR`.
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

/// Loader for one resource type.
#[derive(Clone)]
pub struct ResourceLoader {
    kind: ResourceKind,
    context: Option<String>,
    resolve: Resolver,
    make_load_url: UrlBuilder,
    load_it: fn(&str) -> Action,
    receive: fn(&str, Content) -> Action,
    erred: fn(&str) -> Action,
}

impl fmt::Debug for ResourceLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLoader")
            .field("kind", &self.kind)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl ResourceLoader {
    pub fn documents() -> Self {
        Self {
            kind: ResourceKind::Document,
            context: None,
            resolve: resolve_documents,
            make_load_url: collection_url,
            load_it: |key| ResourceKind::Document.load(key, None),
            receive: |key, content| {
                ResourceKind::Document.receive(key, DocumentContent::normalize(content))
            },
            erred: |key| ResourceKind::Document.erred(key),
        }
    }

    pub fn models() -> Self {
        Self {
            kind: ResourceKind::Model,
            context: None,
            resolve: resolve_models,
            make_load_url: collection_url,
            load_it: |key| ResourceKind::Model.load(key, None),
            receive: |key, content| ResourceKind::Model.receive(key, content),
            erred: |key| ResourceKind::Model.erred(key),
        }
    }

    /// Models loaded in the context of the document that contains them.
    ///
    /// Nothing is fetched while the document is unknown, and `{document}` in
    /// the models' base url is filled with its key.
    pub fn models_for_document(document_key: impl Into<String>) -> Self {
        Self {
            context: Some(document_key.into()),
            ..Self::models()
        }
    }

    pub fn media() -> Self {
        Self {
            kind: ResourceKind::Medium,
            context: None,
            resolve: resolve_media,
            make_load_url: collection_url,
            load_it: |key| ResourceKind::Medium.load(key, None),
            receive: |key, content| ResourceKind::Medium.receive(key, content),
            erred: |key| ResourceKind::Medium.erred(key),
        }
    }

    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Document => Self::documents(),
            ResourceKind::Model => Self::models(),
            ResourceKind::Medium => Self::media(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// The collection this loader governs in `state`.
    pub fn substate<'a>(&self, state: &'a RootState) -> Option<&'a ResourceCollection> {
        (self.resolve)(state, self.context.as_deref())
    }

    /// Registers `key` unless it already is. Returns whether it registered.
    pub fn register_if_needed(&self, store: &Store, key: &str) -> bool {
        store
            .dispatch_with(|state| {
                let known = self
                    .substate(state)
                    .is_some_and(|collection| collection.contains(key));
                (!known).then(|| (self.kind.register(key), ()))
            })
            .is_some_and(|(changed, ())| changed)
    }

    /// Loads `key` unless it is unknown, already loading or already loaded.
    ///
    /// The status check and the `load` dispatch happen under the store's
    /// lock, so overlapping calls for one key fetch it once. A failed fetch
    /// leaves the entry in `ERROR`; calling this again retries it. The url is
    /// derived on every attempt and never written back to the entry, so a
    /// corrected base url applies to the retry.
    pub async fn fetch_if_needed(
        &self,
        store: &Store,
        fetcher: &dyn Fetcher,
        key: &str,
    ) -> FetchOutcome {
        let mut skipped = None;
        let planned = store.dispatch_with(|state| match self.plan(state, key) {
            Ok(url) => Some(((self.load_it)(key), url)),
            Err(reason) => {
                skipped = Some(reason);
                None
            }
        });
        let Some((_, url)) = planned else {
            let reason = skipped.unwrap_or(SkipReason::Unresolved);
            log::debug!("Not fetching {} {key}: {reason}", self.kind);
            return FetchOutcome::Skipped(reason);
        };

        let Some(url) = url else {
            let err = FetchError::MissingUrl(format!("{} {key}", self.kind));
            log::warn!("{err}");
            store.dispatch((self.erred)(key));
            return FetchOutcome::Failed(err);
        };

        match fetcher.fetch(&url).await {
            Ok(content) => {
                if store.dispatch((self.receive)(key, content)) {
                    log::debug!("Received {} {key} from {url}", self.kind);
                    FetchOutcome::Loaded
                } else {
                    log::warn!(
                        "Discarding {} {key} from {url}: the entry stopped loading",
                        self.kind
                    );
                    FetchOutcome::Discarded
                }
            }
            Err(err) => {
                log::warn!("Failed to load {} {key} from {url}: {err}", self.kind);
                store.dispatch((self.erred)(key));
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Registers `key` if needed and then fetches it if needed.
    pub async fn ensure_loaded(
        &self,
        store: &Store,
        fetcher: &dyn Fetcher,
        key: &str,
    ) -> FetchOutcome {
        self.register_if_needed(store, key);
        self.fetch_if_needed(store, fetcher, key).await
    }

    fn plan(&self, state: &RootState, key: &str) -> Result<Option<String>, SkipReason> {
        let collection = self.substate(state).ok_or(SkipReason::Unresolved)?;
        let entry = collection.entry(key).ok_or(SkipReason::Unregistered)?;
        match entry.status {
            Status::Loading => Err(SkipReason::InFlight),
            Status::Ready => Err(SkipReason::AlreadyLoaded),
            Status::Uninitialized => Err(SkipReason::Unregistered),
            Status::Initialized | Status::Error => Ok((self.make_load_url)(
                collection,
                entry,
                self.context.as_deref(),
            )),
        }
    }
}

fn resolve_documents<'a>(state: &'a RootState, _: Option<&str>) -> Option<&'a ResourceCollection> {
    Some(state.documents.as_ref())
}

fn resolve_models<'a>(
    state: &'a RootState,
    document_key: Option<&str>,
) -> Option<&'a ResourceCollection> {
    match document_key {
        Some(document_key) if !state.documents.contains(document_key) => None,
        _ => Some(&state.models.collection),
    }
}

fn resolve_media<'a>(state: &'a RootState, _: Option<&str>) -> Option<&'a ResourceCollection> {
    Some(state.media.as_ref())
}

fn collection_url(
    collection: &ResourceCollection,
    entry: &ResourceEntry,
    context: Option<&str>,
) -> Option<String> {
    collection.load_url(entry, context)
}
