//! Persisted entry drafts.
//! 持久化的条目草稿
//!
//! One draft for a brand new entry, plus follow-up drafts keyed by the
//! parent entry and superseding drafts keyed by the entry they replace.
//! Every mutation is written back through the key-value port.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use elog_core::ports::KeyValueStorePort;
use elog_core::{Entry, EntryForm, EntryId};

const DRAFT_STORE_KEY: &str = "draft-store";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftsState {
    #[serde(default)]
    new_entry: EntryForm,
    #[serde(default)]
    follow_ups: HashMap<EntryId, EntryForm>,
    #[serde(default)]
    supersedes: HashMap<EntryId, EntryForm>,
}

pub struct DraftStore {
    kv: Arc<dyn KeyValueStorePort>,
    state: Mutex<DraftsState>,
}

impl DraftStore {
    /// Restores drafts from `kv`. A malformed stored value is discarded.
    pub async fn load(kv: Arc<dyn KeyValueStorePort>) -> Result<Self> {
        let raw = kv
            .load(DRAFT_STORE_KEY)
            .await
            .context("failed to read stored drafts")?;
        let state = match raw {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "stored drafts are malformed, starting empty");
                DraftsState::default()
            }),
            None => DraftsState::default(),
        };
        debug!(
            follow_ups = state.follow_ups.len(),
            supersedes = state.supersedes.len(),
            "drafts loaded"
        );
        Ok(Self {
            kv,
            state: Mutex::new(state),
        })
    }

    pub async fn new_entry_draft(&self) -> EntryForm {
        self.state.lock().await.new_entry.clone()
    }

    pub async fn update_new_entry(&self, draft: EntryForm) -> Result<()> {
        self.mutate(|state| state.new_entry = draft).await
    }

    pub async fn discard_new_entry(&self) -> Result<()> {
        self.mutate(|state| state.new_entry = EntryForm::default()).await
    }

    /// Stored follow-up draft for `parent`, or an empty one in its logbook.
    pub async fn get_or_create_follow_up_draft(&self, parent: &Entry) -> EntryForm {
        let state = self.state.lock().await;
        state
            .follow_ups
            .get(&parent.summary.id)
            .cloned()
            .unwrap_or_else(|| EntryForm::follow_up_of(parent))
    }

    pub async fn update_follow_up_draft(&self, parent: &EntryId, draft: EntryForm) -> Result<()> {
        let parent = parent.clone();
        self.mutate(|state| {
            state.follow_ups.insert(parent, draft);
        })
        .await
    }

    pub async fn discard_follow_up_draft(&self, parent: &EntryId) -> Result<()> {
        self.mutate(|state| {
            state.follow_ups.remove(parent);
        })
        .await
    }

    /// Stored superseding draft for `entry`, or a copy of the entry itself.
    pub async fn get_or_create_superseding_draft(&self, entry: &Entry) -> EntryForm {
        let state = self.state.lock().await;
        state
            .supersedes
            .get(&entry.summary.id)
            .cloned()
            .unwrap_or_else(|| EntryForm::from(entry))
    }

    pub async fn update_superseding_draft(
        &self,
        superseded: &EntryId,
        draft: EntryForm,
    ) -> Result<()> {
        let superseded = superseded.clone();
        self.mutate(|state| {
            state.supersedes.insert(superseded, draft);
        })
        .await
    }

    pub async fn discard_superseding_draft(&self, superseded: &EntryId) -> Result<()> {
        self.mutate(|state| {
            state.supersedes.remove(superseded);
        })
        .await
    }

    /// Applies `f` and persists the result under the state lock. On a
    /// failed save the in-memory state is rolled back to what is on disk.
    async fn mutate(&self, f: impl FnOnce(&mut DraftsState) + Send) -> Result<()> {
        let mut state = self.state.lock().await;
        let previous = state.clone();
        f(&mut state);
        let saved = match serde_json::to_string(&*state).context("failed to serialize drafts") {
            Ok(raw) => self
                .kv
                .save(DRAFT_STORE_KEY, &raw)
                .await
                .context("failed to persist drafts"),
            Err(err) => Err(err),
        };
        if saved.is_err() {
            *state = previous;
        }
        saved
    }
}
