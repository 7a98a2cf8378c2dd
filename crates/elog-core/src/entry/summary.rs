use serde::{Deserialize, Serialize};

use crate::feed::SortKey;
use crate::ids::{AttachmentId, EntryId, LogbookId, TagId};
use crate::time::Timestamp;

/// Tag as embedded in an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub id: TagId,
    #[serde(default)]
    pub name: String,
}

/// Attachment metadata as embedded in an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub id: AttachmentId,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub content_type: String,
}

/// One row of the entry list.
///
/// 条目列表中的一行。Immutable once fetched; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub id: EntryId,
    pub logged_at: Timestamp,
    pub event_at: Timestamp,
    pub title: String,
    #[serde(rename = "logbook", alias = "logbookId")]
    pub logbook_id: LogbookId,
    #[serde(default)]
    pub tags: Vec<TagRef>,
    #[serde(default)]
    pub attachments: Vec<AttachmentRef>,
}

impl EntrySummary {
    /// Value of the given sort key for this entry.
    pub fn sort_value(&self, key: SortKey) -> Timestamp {
        match key {
            SortKey::LoggedAt => self.logged_at,
            SortKey::EventAt => self.event_at,
        }
    }
}

/// Full entry including its body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(flatten)]
    pub summary: EntrySummary,
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_deserializes_backend_shape() {
        let json = r#"{
            "id": "E1",
            "loggedAt": "2024-01-05T10:00:00Z",
            "eventAt": "2024-01-05T09:30:00Z",
            "title": "Beam dump",
            "logbook": "LB1",
            "tags": [{"id": "T1", "name": "RF"}],
            "attachments": [{"id": "A1", "fileName": "plot.png", "contentType": "image/png"}]
        }"#;
        let entry: EntrySummary = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, EntryId::from("E1"));
        assert_eq!(entry.logbook_id, LogbookId::from("LB1"));
        assert_eq!(entry.tags[0].name, "RF");
        assert_eq!(entry.attachments[0].file_name, "plot.png");
        assert!(entry.sort_value(SortKey::LoggedAt) > entry.sort_value(SortKey::EventAt));
    }

    #[test]
    fn full_entry_flattens_summary_fields() {
        let json = r#"{
            "id": "E2",
            "loggedAt": "2024-01-05T10:00:00Z",
            "eventAt": "2024-01-05T10:00:00Z",
            "title": "Shift summary",
            "logbookId": "LB2",
            "text": "All quiet."
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.summary.logbook_id, LogbookId::from("LB2"));
        assert!(entry.summary.tags.is_empty());
        assert_eq!(entry.text, "All quiet.");
    }
}
