use serde::{Deserialize, Serialize};

use crate::entry::EntrySummary;
use crate::feed::FeedPhase;
use crate::ids::EntryId;

/// Read-only view of the feed handed to the list view.
///
/// 提供给列表视图的只读快照。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub entries: Vec<EntrySummary>,
    pub is_loading: bool,
    pub reached_bottom: bool,
    pub phase: FeedPhase,
    /// Entry whose context window is shown, if any.
    pub spotlight: Option<EntryId>,
    pub show_back_to_top: bool,
}

impl Default for FeedSnapshot {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            is_loading: false,
            reached_bottom: false,
            phase: FeedPhase::Idle,
            spotlight: None,
            show_back_to_top: false,
        }
    }
}
