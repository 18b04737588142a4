//! Domain types for the showcase store.
//! Defines the resource lifecycle vocabulary, the records tracked per resource and the settings model.

pub mod collection;
pub mod entry;
pub mod error;
pub mod settings;
pub mod status;

pub use collection::*;
pub use entry::*;
pub use error::*;
pub use settings::*;
pub use status::*;
