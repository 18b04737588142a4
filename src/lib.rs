//! State store and resource loader for a document and media showcase site.
//!
//! The root state is a tree of slices (settings, the shown document, the
//! documents, models and media collections) updated only by pure reducers.
//! [`store::ResourceLoader`] drives the register, load, receive and erred
//! lifecycle against a [`infra::fetch::Fetcher`].

pub mod domain;
pub mod infra;
pub mod store;

pub use store::{Action, ResourceKind, ResourceLoader, RootState, Store};
