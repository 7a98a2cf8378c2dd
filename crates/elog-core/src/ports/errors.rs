use thiserror::Error;

use crate::ids::EntryId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryRepositoryError {
    #[error("entry not found: {0}")]
    NotFound(EntryId),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserAuthorizationError {
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("network error: {0}")]
    Network(String),
}
