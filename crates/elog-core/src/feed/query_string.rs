//! FilterState <-> query-string parameters.
//!
//! Lists are comma-joined, booleans are presence flags, dates are `YYYY-MM-DD`.
//! Default values are left out so an untouched filter yields an empty query.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::feed::FilterState;
use crate::time::Timestamp;

const SEARCH: &str = "search";
const LOGBOOKS: &str = "logbooks";
const TAGS: &str = "tags";
const REQUIRE_ALL_TAGS: &str = "requireAllTags";
const START_DATE: &str = "startDate";
const END_DATE: &str = "endDate";
const SORT_BY_LOG_DATE: &str = "sortByLogDate";
const ONLY_FAVORITES: &str = "onlyFavorites";

pub fn to_query_pairs(filters: &FilterState) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if !filters.logbooks.is_empty() {
        pairs.push((LOGBOOKS, join(filters.logbooks.iter().map(|id| id.as_ref()))));
    }
    if !filters.tags.is_empty() {
        pairs.push((TAGS, join(filters.tags.iter().map(|id| id.as_ref()))));
    }
    if filters.require_all_tags {
        pairs.push((REQUIRE_ALL_TAGS, String::new()));
    }
    if let Some(date) = filters.start_date {
        pairs.push((START_DATE, date.format("%Y-%m-%d").to_string()));
    }
    if let Some(date) = filters.end_date {
        pairs.push((END_DATE, date.format("%Y-%m-%d").to_string()));
    }
    if !filters.search.is_empty() {
        pairs.push((SEARCH, filters.search.clone()));
    }
    if filters.sort_by_log_date {
        pairs.push((SORT_BY_LOG_DATE, String::new()));
    }
    if filters.only_favorites {
        pairs.push((ONLY_FAVORITES, String::new()));
    }
    pairs
}

/// Builds a FilterState from decoded query pairs. Unknown keys are ignored;
/// an unparsable date is treated as absent.
pub fn from_query_pairs<I, K, V>(pairs: I) -> FilterState
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut filters = FilterState::default();
    for (key, value) in pairs {
        let value = value.as_ref();
        match key.as_ref() {
            SEARCH => filters.search = value.to_string(),
            LOGBOOKS => filters.logbooks = split(value),
            TAGS => filters.tags = split(value),
            REQUIRE_ALL_TAGS => filters.require_all_tags = true,
            START_DATE => filters.start_date = parse_date(value),
            END_DATE => filters.end_date = parse_date(value),
            SORT_BY_LOG_DATE => filters.sort_by_log_date = true,
            ONLY_FAVORITES => filters.only_favorites = true,
            _ => {}
        }
    }
    filters
}

fn join<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join(",")
}

fn split<T: Ord + From<String>>(value: &str) -> BTreeSet<T> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| T::from(s.to_string()))
        .collect()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        Timestamp::parse(value).and_then(|ts| {
            chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ts.as_millis())
                .map(|dt| dt.date_naive())
        })
    });
    if parsed.is_none() && !value.is_empty() {
        tracing::warn!(value, "ignoring unparsable date filter");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{LogbookId, TagId};

    #[test]
    fn default_filter_has_no_params() {
        assert!(to_query_pairs(&FilterState::default()).is_empty());
    }

    #[test]
    fn round_trip_preserves_filters() {
        let filters = FilterState {
            search: "klystron fault".into(),
            logbooks: [LogbookId::from("L1"), LogbookId::from("L2")]
                .into_iter()
                .collect(),
            tags: [TagId::from("T9")].into_iter().collect(),
            require_all_tags: true,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5),
            sort_by_log_date: true,
            only_favorites: false,
        };
        let pairs = to_query_pairs(&filters);
        assert!(pairs.contains(&("logbooks", "L1,L2".to_string())));
        assert!(pairs.contains(&("requireAllTags", String::new())));
        assert!(!pairs.iter().any(|(k, _)| *k == "onlyFavorites"));

        assert_eq!(from_query_pairs(pairs), filters);
    }

    #[test]
    fn dates_accept_full_timestamps_and_skip_garbage() {
        let filters = from_query_pairs([
            ("startDate", "2024-01-05T22:00:00.000Z"),
            ("endDate", "not-a-date"),
            ("logbooks", "L1,,L2"),
            ("page", "3"),
        ]);
        assert_eq!(filters.start_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(filters.end_date, None);
        assert_eq!(filters.logbooks.len(), 2);
    }
}
