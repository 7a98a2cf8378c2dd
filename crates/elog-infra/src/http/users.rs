//! User logbook grants over the admin endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use elog_core::admin::AuthorizationType;
use elog_core::ports::{UserAuthorizationError, UserAuthorizationPort};
use elog_core::{LogbookId, UserId};

use super::{ApiClient, ApiError};

#[derive(Serialize)]
struct CreateGrant<'a> {
    #[serde(rename = "userID")]
    user_id: &'a str,
    #[serde(rename = "logbookID")]
    logbook_id: &'a str,
    #[serde(rename = "authorizationType")]
    authorization_type: &'static str,
}

#[derive(Serialize)]
struct UpdateGrant<'a> {
    #[serde(rename = "logbookID")]
    logbook_id: &'a str,
    #[serde(rename = "authorizationType")]
    authorization_type: &'static str,
}

pub struct HttpUserAuthorizationRepository {
    client: Arc<ApiClient>,
}

impl HttpUserAuthorizationRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserAuthorizationPort for HttpUserAuthorizationRepository {
    async fn create(
        &self,
        user: &UserId,
        logbook: &LogbookId,
        authorization: AuthorizationType,
    ) -> Result<(), UserAuthorizationError> {
        let body = CreateGrant {
            user_id: user.as_ref(),
            logbook_id: logbook.as_ref(),
            authorization_type: authorization.as_str(),
        };
        self.client
            .post(&["v1", "logbooks", "auth", "user"], &body)
            .await
            .map_err(map_api_error)?;
        info!(%user, %logbook, authorization = authorization.as_str(), "grant created");
        Ok(())
    }

    async fn update(
        &self,
        user: &UserId,
        logbook: &LogbookId,
        authorization: AuthorizationType,
    ) -> Result<(), UserAuthorizationError> {
        let body = UpdateGrant {
            logbook_id: logbook.as_ref(),
            authorization_type: authorization.as_str(),
        };
        self.client
            .put(&["v1", "logbook", "auth", "user", user.as_ref()], &body)
            .await
            .map_err(map_api_error)?;
        info!(%user, %logbook, authorization = authorization.as_str(), "grant updated");
        Ok(())
    }

    async fn remove(
        &self,
        user: &UserId,
        logbook: &LogbookId,
    ) -> Result<(), UserAuthorizationError> {
        self.client
            .delete(
                &["v1", "logbook", "auth", "user", user.as_ref()],
                &[("logbookID", logbook.to_string())],
            )
            .await
            .map_err(map_api_error)?;
        info!(%user, %logbook, "grant removed");
        Ok(())
    }
}

fn map_api_error(err: ApiError) -> UserAuthorizationError {
    match err {
        ApiError::Timeout | ApiError::Network(_) => UserAuthorizationError::Network(err.to_string()),
        other => UserAuthorizationError::Rejected(other.to_string()),
    }
}
