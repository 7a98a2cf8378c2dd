//! Id-keyed cache of entry summaries.
//! 按 id 缓存的条目摘要

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use elog_core::ports::{EntryRepositoryError, EntryRepositoryPort};
use elog_core::{EntryId, EntrySummary};

/// Entries seen by this client, filled from every loaded page.
pub struct EntryCache {
    repo: Arc<dyn EntryRepositoryPort>,
    entries: RwLock<HashMap<EntryId, EntrySummary>>,
}

impl EntryCache {
    pub fn new(repo: Arc<dyn EntryRepositoryPort>) -> Self {
        Self {
            repo,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, id: &EntryId) -> Option<EntrySummary> {
        self.entries.read().await.get(id).cloned()
    }

    pub async fn insert_many(&self, entries: &[EntrySummary]) {
        let mut guard = self.entries.write().await;
        for entry in entries {
            guard.insert(entry.id.clone(), entry.clone());
        }
    }

    /// Cached summary, or fetched from the backend and cached.
    pub async fn get_or_fetch(&self, id: &EntryId) -> Result<EntrySummary, EntryRepositoryError> {
        if let Some(entry) = self.get(id).await {
            return Ok(entry);
        }
        debug!(entry_id = %id, "entry cache miss");
        let entry = self.repo.fetch_entry_by_id(id).await?.summary;
        self.entries
            .write()
            .await
            .insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }
}
