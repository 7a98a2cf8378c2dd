use std::collections::HashMap;

use tokio::sync::RwLock;

use elog_core::admin::{User, UserForm};
use elog_core::UserId;

/// Pending grant edits, keyed by user id.
///
/// A form that matches the user's current grants is not kept.
#[derive(Default)]
pub struct UserFormStore {
    forms: RwLock<HashMap<UserId, UserForm>>,
}

impl UserFormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn start_editing(&self, user: &User) -> UserForm {
        self.forms
            .read()
            .await
            .get(&user.uid)
            .cloned()
            .unwrap_or_else(|| UserForm::from(user))
    }

    pub async fn get(&self, id: &UserId) -> Option<UserForm> {
        self.forms.read().await.get(id).cloned()
    }

    /// Stores `form` for `user`, or drops it when it no longer differs from
    /// the user's current grants.
    pub async fn update_form(&self, user: &User, form: UserForm) {
        let mut forms = self.forms.write().await;
        if form == UserForm::from(user) {
            forms.remove(&user.uid);
        } else {
            forms.insert(user.uid.clone(), form);
        }
    }

    pub async fn remove_form(&self, id: &UserId) -> Option<UserForm> {
        self.forms.write().await.remove(id)
    }
}
