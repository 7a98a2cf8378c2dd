use serde::{Deserialize, Serialize};

use crate::entry::{AttachmentRef, Entry};
use crate::ids::{LogbookId, TagId};

/// Editable entry draft (new entry, follow-up, or supersession).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryForm {
    pub title: String,
    pub text: String,
    pub logbook: Option<LogbookId>,
    #[serde(default)]
    pub attachments: Vec<AttachmentRef>,
    #[serde(default)]
    pub tags: Vec<TagId>,
}

impl EntryForm {
    /// Empty draft preset to the parent entry's logbook.
    pub fn follow_up_of(entry: &Entry) -> Self {
        Self {
            logbook: Some(entry.summary.logbook_id.clone()),
            ..Self::default()
        }
    }
}

impl From<&Entry> for EntryForm {
    fn from(entry: &Entry) -> Self {
        Self {
            title: entry.summary.title.clone(),
            text: entry.text.clone(),
            logbook: Some(entry.summary.logbook_id.clone()),
            attachments: entry.summary.attachments.clone(),
            tags: entry.summary.tags.iter().map(|t| t.id.clone()).collect(),
        }
    }
}
