use serde::{Deserialize, Serialize};

use crate::ids::{LogbookId, TagId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub name: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logbook {
    pub id: LogbookId,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub shifts: Vec<Shift>,
}

/// Tag being edited; new tags have no id until the backend assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDraft {
    pub id: Option<TagId>,
    pub name: String,
}

/// Editable copy of a logbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogbookForm {
    pub id: LogbookId,
    pub name: String,
    pub tags: Vec<TagDraft>,
    pub shifts: Vec<Shift>,
}

impl From<&Logbook> for LogbookForm {
    fn from(logbook: &Logbook) -> Self {
        Self {
            id: logbook.id.clone(),
            name: logbook.name.clone(),
            tags: logbook
                .tags
                .iter()
                .map(|t| TagDraft {
                    id: Some(t.id.clone()),
                    name: t.name.clone(),
                })
                .collect(),
            shifts: logbook.shifts.clone(),
        }
    }
}
