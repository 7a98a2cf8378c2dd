//! Use case for saving a user's edited logbook grants
//! 保存用户日志本授权的用例

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use elog_core::admin::{AuthorizationType, User};
use elog_core::ports::{UserAuthorizationError, UserAuthorizationPort};
use elog_core::LogbookId;

use crate::usecases::UserFormStore;

#[derive(Debug, thiserror::Error)]
pub enum SaveUserAuthorizationsError {
    #[error("failed to {operation} grant on logbook {logbook}: {source}")]
    Backend {
        operation: &'static str,
        logbook: LogbookId,
        #[source]
        source: UserAuthorizationError,
    },
}

/// Pushes the pending form for a user to the backend.
///
/// ## Behavior / 行为
/// - Grants only in the form are created
/// - Grants whose type changed are updated
/// - Grants missing from the form are removed
/// - The form is dropped once every call succeeded
pub struct SaveUserAuthorizations {
    port: Arc<dyn UserAuthorizationPort>,
    forms: Arc<UserFormStore>,
}

impl SaveUserAuthorizations {
    pub fn new(port: Arc<dyn UserAuthorizationPort>, forms: Arc<UserFormStore>) -> Self {
        Self { port, forms }
    }

    /// Returns the number of backend calls issued.
    pub async fn execute(&self, user: &User) -> Result<usize, SaveUserAuthorizationsError> {
        let span = info_span!("usecase.save_user_authorizations.execute", user = %user.uid);

        async {
            let Some(form) = self.forms.get(&user.uid).await else {
                info!("no pending grant changes");
                return Ok(0);
            };

            let current: BTreeMap<_, _> = user
                .authorizations
                .iter()
                .map(|a| (a.logbook.clone(), a.authorization_type))
                .collect();
            let wanted: BTreeMap<_, _> = form
                .authorizations
                .iter()
                .map(|a| (a.logbook.clone(), a.authorization_type))
                .collect();

            let mut calls = 0;
            for (logbook, kind) in &wanted {
                match current.get(logbook) {
                    None => self.create(user, logbook, *kind).await?,
                    Some(existing) if existing != kind => self.update(user, logbook, *kind).await?,
                    Some(_) => continue,
                }
                calls += 1;
            }
            for logbook in current.keys().filter(|l| !wanted.contains_key(*l)) {
                self.port.remove(&user.uid, logbook).await.map_err(|source| {
                    SaveUserAuthorizationsError::Backend {
                        operation: "remove",
                        logbook: logbook.clone(),
                        source,
                    }
                })?;
                calls += 1;
            }

            self.forms.remove_form(&user.uid).await;
            info!(calls, "user grants saved");
            Ok(calls)
        }
        .instrument(span)
        .await
    }

    async fn create(
        &self,
        user: &User,
        logbook: &LogbookId,
        kind: AuthorizationType,
    ) -> Result<(), SaveUserAuthorizationsError> {
        self.port
            .create(&user.uid, logbook, kind)
            .await
            .map_err(|source| SaveUserAuthorizationsError::Backend {
                operation: "create",
                logbook: logbook.clone(),
                source,
            })
    }

    async fn update(
        &self,
        user: &User,
        logbook: &LogbookId,
        kind: AuthorizationType,
    ) -> Result<(), SaveUserAuthorizationsError> {
        self.port
            .update(&user.uid, logbook, kind)
            .await
            .map_err(|source| SaveUserAuthorizationsError::Backend {
                operation: "update",
                logbook: logbook.clone(),
                source,
            })
    }
}
