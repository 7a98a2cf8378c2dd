use serde::{Deserialize, Serialize};

use crate::ids::EntryId;
use crate::ports::EntryRepositoryError;

/// Errors the feed surfaces to the view layer.
///
/// Superseded requests never produce one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum FeedError {
    #[error("failed to load entries: {0}")]
    NetworkFailure(String),

    #[error("spotlighted entry {0} not found")]
    SpotlightNotFound(EntryId),
}

impl FeedError {
    /// Maps a failed page or context fetch.
    ///
    /// Malformed payloads are logged and reported as network failures.
    pub fn from_page_error(err: EntryRepositoryError) -> Self {
        match err {
            EntryRepositoryError::MalformedResponse(msg) => {
                tracing::warn!(error = %msg, "malformed entries response");
                FeedError::NetworkFailure(format!("malformed response: {msg}"))
            }
            other => FeedError::NetworkFailure(other.to_string()),
        }
    }

    /// Maps a failed lookup of the spotlight target.
    pub fn from_spotlight_error(id: &EntryId, err: EntryRepositoryError) -> Self {
        match err {
            EntryRepositoryError::NotFound(_) => FeedError::SpotlightNotFound(id.clone()),
            other => FeedError::from_page_error(other),
        }
    }
}
