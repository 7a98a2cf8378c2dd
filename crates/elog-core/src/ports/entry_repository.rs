use async_trait::async_trait;

use crate::entry::{Entry, EntrySummary};
use crate::feed::EntryQuery;
use crate::ids::EntryId;
use crate::ports::EntryRepositoryError;

/// Read access to log entries on the backend.
#[async_trait]
pub trait EntryRepositoryPort: Send + Sync {
    /// Entries matching `query`, newest first.
    async fn fetch_entries(
        &self,
        query: &EntryQuery,
    ) -> Result<Vec<EntrySummary>, EntryRepositoryError>;

    async fn fetch_entry_by_id(&self, id: &EntryId) -> Result<Entry, EntryRepositoryError>;
}
