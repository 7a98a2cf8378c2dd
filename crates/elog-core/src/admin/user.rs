use serde::{Deserialize, Serialize};

use crate::ids::{LogbookId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorizationType {
    Read,
    Write,
    Admin,
}

impl AuthorizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorizationType::Read => "Read",
            AuthorizationType::Write => "Write",
            AuthorizationType::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLogbookAuthorization {
    pub logbook: LogbookId,
    pub authorization_type: AuthorizationType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mail: String,
    #[serde(default)]
    pub authorizations: Vec<UserLogbookAuthorization>,
}

/// Pending edit of a user's logbook grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserForm {
    pub user: UserId,
    pub authorizations: Vec<UserLogbookAuthorization>,
}

impl From<&User> for UserForm {
    fn from(user: &User) -> Self {
        Self {
            user: user.uid.clone(),
            authorizations: user.authorizations.clone(),
        }
    }
}
