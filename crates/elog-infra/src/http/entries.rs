//! Entries over `GET v1/entries`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use elog_core::feed::EntryQuery;
use elog_core::ports::{EntryRepositoryError, EntryRepositoryPort};
use elog_core::{Entry, EntryId, EntrySummary};

use super::{ApiClient, ApiError};

pub struct HttpEntryRepository {
    client: Arc<ApiClient>,
}

impl HttpEntryRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntryRepositoryPort for HttpEntryRepository {
    async fn fetch_entries(
        &self,
        query: &EntryQuery,
    ) -> Result<Vec<EntrySummary>, EntryRepositoryError> {
        let params = wire_params(query);
        debug!(?params, "fetching entries");
        self.client
            .get(&["v1", "entries"], &params)
            .await
            .map_err(map_api_error)
    }

    async fn fetch_entry_by_id(&self, id: &EntryId) -> Result<Entry, EntryRepositoryError> {
        self.client
            .get(&["v1", "entries", id.as_ref()], &[])
            .await
            .map_err(|err| match err {
                ApiError::NotFound | ApiError::InvalidUrl(_) => {
                    EntryRepositoryError::NotFound(id.clone())
                }
                other => map_api_error(other),
            })
    }
}

fn map_api_error(err: ApiError) -> EntryRepositoryError {
    match err {
        ApiError::Decode(msg) => EntryRepositoryError::MalformedResponse(msg),
        other => EntryRepositoryError::Network(other.to_string()),
    }
}

/// Backend parameter names. The backend's `startDate` is the upper bound
/// (entries before it) and `endDate` the lower one.
fn wire_params(query: &EntryQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(search) = &query.search {
        params.push(("search", search.clone()));
    }
    if !query.logbooks.is_empty() {
        params.push(("logbooks", join(query.logbooks.iter().map(|id| id.as_ref()))));
    }
    if !query.tags.is_empty() {
        params.push(("tags", join(query.tags.iter().map(|id| id.as_ref()))));
    }
    if query.require_all_tags {
        params.push(("requireAllTags", "true".to_string()));
    }
    if query.sort_by_log_date {
        params.push(("sortByLogDate", "true".to_string()));
    }
    if query.only_favorites {
        params.push(("onlyFavorites", "true".to_string()));
    }
    if let Some(before) = query.before {
        params.push(("startDate", before.to_rfc3339()));
    }
    if let Some(after) = query.after {
        params.push(("endDate", after.to_rfc3339()));
    }
    if let Some(size) = query.context_size {
        params.push(("contextSize", size.to_string()));
    }
    params.push(("limit", query.limit.to_string()));
    params
}

fn join<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join(",")
}
