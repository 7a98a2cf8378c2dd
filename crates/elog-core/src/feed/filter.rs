use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{LogbookId, TagId};

/// Timestamp the feed is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    LoggedAt,
    EventAt,
}

/// Entry list filters, as carried by the query string.
///
/// Replaced wholesale on every edit; two values are the same filter when
/// their [`fingerprint`](FilterState::fingerprint)s match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search: String,
    pub logbooks: BTreeSet<LogbookId>,
    pub tags: BTreeSet<TagId>,
    pub require_all_tags: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort_by_log_date: bool,
    pub only_favorites: bool,
}

impl FilterState {
    pub fn sort_key(&self) -> SortKey {
        if self.sort_by_log_date {
            SortKey::LoggedAt
        } else {
            SortKey::EventAt
        }
    }

    /// Serialized identity of this filter.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }

    pub fn is_default(&self) -> bool {
        self.fingerprint() == FilterState::default().fingerprint()
    }
}

/// Side effect asking the query-string layer to replace its filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterReset {
    pub filters: FilterState,
    /// Merge into the current history entry and keep its navigation state
    /// instead of discarding it.
    pub preserve_history: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logbooks(ids: &[&str]) -> BTreeSet<LogbookId> {
        ids.iter().map(|id| LogbookId::from(*id)).collect()
    }

    #[test]
    fn fingerprint_ignores_insertion_order() {
        let a = FilterState {
            logbooks: logbooks(&["L2", "L1"]),
            ..FilterState::default()
        };
        let b = FilterState {
            logbooks: logbooks(&["L1", "L2"]),
            ..FilterState::default()
        };
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn sort_key_follows_log_date_flag() {
        let mut filters = FilterState::default();
        assert_eq!(filters.sort_key(), SortKey::EventAt);
        filters.sort_by_log_date = true;
        assert_eq!(filters.sort_key(), SortKey::LoggedAt);
    }

    #[test]
    fn default_is_default() {
        assert!(FilterState::default().is_default());
        let searched = FilterState {
            search: "x".into(),
            ..FilterState::default()
        };
        assert!(!searched.is_default());
    }
}
