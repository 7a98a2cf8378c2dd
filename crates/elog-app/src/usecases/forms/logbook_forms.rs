use std::collections::HashMap;

use tokio::sync::RwLock;

use elog_core::admin::{Logbook, LogbookForm};
use elog_core::LogbookId;

/// Unsaved logbook edits, keyed by logbook id.
#[derive(Default)]
pub struct LogbookFormStore {
    forms: RwLock<HashMap<LogbookId, LogbookForm>>,
}

impl LogbookFormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored form for `logbook`, or a fresh one built from it.
    pub async fn start_editing(&self, logbook: &Logbook) -> LogbookForm {
        self.forms
            .read()
            .await
            .get(&logbook.id)
            .cloned()
            .unwrap_or_else(|| LogbookForm::from(logbook))
    }

    pub async fn upsert_form(&self, form: LogbookForm) {
        self.forms.write().await.insert(form.id.clone(), form);
    }

    pub async fn discard(&self, id: &LogbookId) -> Option<LogbookForm> {
        self.forms.write().await.remove(id)
    }
}
