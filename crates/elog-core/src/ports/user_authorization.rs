use async_trait::async_trait;

use crate::admin::AuthorizationType;
use crate::ids::{LogbookId, UserId};
use crate::ports::UserAuthorizationError;

/// Per-logbook user grants on the backend.
#[async_trait]
pub trait UserAuthorizationPort: Send + Sync {
    async fn create(
        &self,
        user: &UserId,
        logbook: &LogbookId,
        authorization: AuthorizationType,
    ) -> Result<(), UserAuthorizationError>;

    async fn update(
        &self,
        user: &UserId,
        logbook: &LogbookId,
        authorization: AuthorizationType,
    ) -> Result<(), UserAuthorizationError>;

    async fn remove(&self, user: &UserId, logbook: &LogbookId)
        -> Result<(), UserAuthorizationError>;
}
