//! Error types for the showcase store.
//!
//! Reducers never fail: these errors describe what went wrong at the edges
//! (fetching, decoding actions, reading configuration) and the lifecycle
//! actions that were refused and logged instead of applied.

use thiserror::Error;

/// A lifecycle action referenced a key that was never registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} resource: {key}")]
pub struct UnknownResourceError {
    pub kind: String,
    pub key: String,
}

/// A lifecycle action asked for a transition the status model forbids.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status transition for {key} from {current} to {next}")]
pub struct InvalidTransitionError {
    pub key: String,
    pub current: String,
    pub next: String,
}

/// Failures while fetching resource content.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("No url could be derived for {0}")]
    MissingUrl(String),

    #[error("Unsupported url: {0}")]
    UnsupportedUrl(String),

    #[error("Failed to read resource: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode resource: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Fetch failed: {0}")]
    Other(#[from] anyhow::Error),
}

/// Failures while talking to the store from the outside.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid action: {0}")]
    InvalidAction(#[from] serde_json::Error),
}

/// Failures while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown setting: {0}")]
    InvalidSetting(String),
}
