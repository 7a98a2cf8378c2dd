use serde::{Deserialize, Serialize};

use crate::feed::FilterState;
use crate::ids::{LogbookId, TagId};
use crate::time::Timestamp;

/// Parameters of one entries fetch.
///
/// `before` bounds the sort key from above (exclusive, or the center of a
/// context window); `after` bounds it from below (inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryQuery {
    pub search: Option<String>,
    pub logbooks: Vec<LogbookId>,
    pub tags: Vec<TagId>,
    pub require_all_tags: bool,
    pub sort_by_log_date: bool,
    pub only_favorites: bool,
    pub before: Option<Timestamp>,
    pub after: Option<Timestamp>,
    pub context_size: Option<usize>,
    pub limit: usize,
}

impl EntryQuery {
    fn filtered(filters: &FilterState, limit: usize) -> Self {
        Self {
            search: (!filters.search.is_empty()).then(|| filters.search.clone()),
            logbooks: filters.logbooks.iter().cloned().collect(),
            tags: filters.tags.iter().cloned().collect(),
            require_all_tags: filters.require_all_tags,
            sort_by_log_date: filters.sort_by_log_date,
            only_favorites: filters.only_favorites,
            before: None,
            after: filters.start_date.map(Timestamp::start_of_utc_day),
            context_size: None,
            limit,
        }
    }

    /// First page under `filters`. A date-only end date covers its whole UTC day.
    pub fn first_page(filters: &FilterState, limit: usize) -> Self {
        Self {
            before: filters.end_date.map(Timestamp::end_of_utc_day),
            ..Self::filtered(filters, limit)
        }
    }

    /// Page of entries strictly older than `cursor`.
    pub fn next_page(filters: &FilterState, cursor: Timestamp, limit: usize) -> Self {
        Self {
            before: Some(cursor),
            ..Self::filtered(filters, limit)
        }
    }

    /// Symmetric window of `size` entries on each side of `anchor`.
    pub fn context(filters: &FilterState, anchor: Timestamp, size: usize) -> Self {
        Self {
            before: Some(anchor),
            context_size: Some(size),
            ..Self::filtered(filters, size)
        }
    }
}
