use std::cmp::Ordering;
use std::collections::HashSet;

use crate::entry::EntrySummary;
use crate::feed::SortKey;
use crate::ids::EntryId;
use crate::time::Timestamp;

/// Ordered, duplicate-free window of loaded entries.
///
/// Invariant: sorted by the active sort key descending, ties by id
/// descending, each id at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedWindow {
    entries: Vec<EntrySummary>,
    ids: HashSet<EntryId>,
    sort_key: SortKey,
}

impl Default for FeedWindow {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            ids: HashSet::new(),
            sort_key: SortKey::EventAt,
        }
    }
}

impl FeedWindow {
    pub fn entries(&self) -> &[EntrySummary] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.ids.contains(id)
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.ids.clear();
    }

    /// Drops the current entries and loads `entries` ordered by `sort_key`.
    pub fn replace(&mut self, entries: Vec<EntrySummary>, sort_key: SortKey) {
        self.clear();
        self.sort_key = sort_key;
        self.append(entries);
    }

    /// Merges a page into the window. Returns how many entries were new.
    pub fn append(&mut self, entries: Vec<EntrySummary>) -> usize {
        let before = self.entries.len();
        for entry in entries {
            if self.ids.insert(entry.id.clone()) {
                self.entries.push(entry);
            }
        }
        let added = self.entries.len() - before;
        if added > 0 {
            let key = self.sort_key;
            self.entries.sort_by(|a, b| compare_desc(a, b, key));
        }
        added
    }

    /// Sort-key value of the oldest loaded entry.
    pub fn cursor(&self) -> Option<Timestamp> {
        self.entries.last().map(|e| e.sort_value(self.sort_key))
    }
}

fn compare_desc(a: &EntrySummary, b: &EntrySummary, key: SortKey) -> Ordering {
    b.sort_value(key)
        .cmp(&a.sort_value(key))
        .then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::LogbookId;

    fn entry(id: &str, event_ms: i64, logged_ms: i64) -> EntrySummary {
        EntrySummary {
            id: EntryId::from(id),
            logged_at: Timestamp::from_millis(logged_ms),
            event_at: Timestamp::from_millis(event_ms),
            title: format!("Entry {id}"),
            logbook_id: LogbookId::from("L1"),
            tags: Vec::new(),
            attachments: Vec::new(),
        }
    }

    fn ids(window: &FeedWindow) -> Vec<&str> {
        window.entries().iter().map(|e| e.id.as_ref()).collect()
    }

    #[test]
    fn replace_orders_by_sort_key_descending() {
        let mut window = FeedWindow::default();
        window.replace(
            vec![entry("A", 100, 300), entry("B", 300, 100), entry("C", 200, 200)],
            SortKey::EventAt,
        );
        assert_eq!(ids(&window), vec!["B", "C", "A"]);

        window.replace(
            vec![entry("A", 100, 300), entry("B", 300, 100), entry("C", 200, 200)],
            SortKey::LoggedAt,
        );
        assert_eq!(ids(&window), vec!["A", "C", "B"]);
    }

    #[test]
    fn ties_are_broken_by_id_descending() {
        let mut window = FeedWindow::default();
        window.replace(
            vec![entry("E1", 100, 0), entry("E3", 100, 0), entry("E2", 100, 0)],
            SortKey::EventAt,
        );
        assert_eq!(ids(&window), vec!["E3", "E2", "E1"]);
    }

    #[test]
    fn append_skips_duplicates_and_keeps_order() {
        let mut window = FeedWindow::default();
        window.replace(vec![entry("A", 300, 0), entry("B", 200, 0)], SortKey::EventAt);

        let added = window.append(vec![entry("B", 200, 0), entry("C", 100, 0)]);
        assert_eq!(added, 1);
        assert_eq!(ids(&window), vec!["A", "B", "C"]);
        assert_eq!(window.cursor(), Some(Timestamp::from_millis(100)));
    }

    #[test]
    fn cursor_of_empty_window_is_none() {
        assert_eq!(FeedWindow::default().cursor(), None);
    }
}
