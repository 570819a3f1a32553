//! Profile-specific types and error definitions.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::http::TransportError;

/// Mapping group used when reading the profile.
pub const MAIN_GROUP: &str = "main";

/// Mapping group used when writing the profile.
pub const UPDATE_GROUP: &str = "update";

/// A type the store can cache.
///
/// Serde doubles as the model constructor: patches are applied by
/// serializing the current value, overlaying fields, and deserializing.
pub trait Profile: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> Profile for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// What a subscriber sees: `None` while no profile is held.
pub type ProfileState<P> = Option<Arc<P>>;

/// Errors converting between typed profiles and wire records.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MappingError {
    #[error("Failed to serialize record: {0}")]
    Serialize(String),

    #[error("Failed to deserialize record: {0}")]
    Deserialize(String),

    /// Wire records must be JSON objects.
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Errors that can occur during profile operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProfileError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Result of [`ProfileStore::refresh`](crate::profile::ProfileStore::refresh).
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome<P> {
    /// The session was not authenticated; nothing was fetched or published.
    Skipped,
    /// The profile was fetched and is now the current value.
    Loaded(Arc<P>),
}

impl<P> RefreshOutcome<P> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, RefreshOutcome::Loaded(_))
    }

    pub fn profile(&self) -> Option<&Arc<P>> {
        match self {
            RefreshOutcome::Loaded(profile) => Some(profile),
            RefreshOutcome::Skipped => None,
        }
    }
}

/// JSON type name for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
