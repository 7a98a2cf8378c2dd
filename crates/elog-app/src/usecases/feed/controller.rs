//! Entry feed controller.
//!
//! Owns the visible window of the entry list. Commands are turned into
//! [`FeedEvent`]s, run through [`FeedStateMachine`], and the resulting
//! actions are executed here. Every transition publishes a fresh
//! [`FeedSnapshot`] to subscribers.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use elog_core::feed::EntryQuery;
use elog_core::ports::{EntryRepositoryPort, FeedEventPort};
use elog_core::{
    EntryId, EntrySummary, FeedAction, FeedError, FeedEvent, FeedModel, FeedSnapshot,
    FeedStateMachine, FilterState, SortKey,
};

use super::cancel::unless_cancelled;
use crate::usecases::EntryCache;

struct InFlight {
    generation: u64,
    token: CancellationToken,
}

/// Pagination and spotlight controller for the entry list.
///
/// 条目列表的分页 / 聚焦控制器。
pub struct EntryFeedController {
    repo: Arc<dyn EntryRepositoryPort>,
    cache: Arc<EntryCache>,
    events: Arc<dyn FeedEventPort>,
    model: Mutex<FeedModel>,
    in_flight: Mutex<Option<InFlight>>,
    snapshot_tx: watch::Sender<FeedSnapshot>,
}

impl EntryFeedController {
    pub fn new(
        repo: Arc<dyn EntryRepositoryPort>,
        cache: Arc<EntryCache>,
        events: Arc<dyn FeedEventPort>,
        page_size: usize,
    ) -> Self {
        let model = FeedModel::new(page_size);
        let (snapshot_tx, _) = watch::channel(model.snapshot());
        Self {
            repo,
            cache,
            events,
            model: Mutex::new(model),
            in_flight: Mutex::new(None),
            snapshot_tx,
        }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Applies filters from the query string. Equal filters are a no-op once loaded.
    pub async fn refresh(&self, filters: FilterState) -> FeedSnapshot {
        self.dispatch(FeedEvent::FiltersChanged(filters)).await
    }

    /// Reloads the first page under the current filters.
    pub async fn reload(&self) -> FeedSnapshot {
        self.dispatch(FeedEvent::Reload).await
    }

    pub async fn load_more(&self) -> FeedSnapshot {
        self.dispatch(FeedEvent::LoadMore).await
    }

    /// Reveals `id`, replacing the window with the entries around it.
    pub async fn spotlight(&self, id: EntryId) -> FeedSnapshot {
        self.dispatch(FeedEvent::Spotlight(id)).await
    }

    pub async fn back_to_top(&self) -> FeedSnapshot {
        self.dispatch(FeedEvent::BackToTop).await
    }

    async fn dispatch(&self, event: FeedEvent) -> FeedSnapshot {
        let span = info_span!("usecase.entry_feed.dispatch", event = event_name(&event));
        async {
            let mut pending = VecDeque::from([event]);
            while let Some(event) = pending.pop_front() {
                let actions = self.apply(event).await;
                for action in actions {
                    if let Some(follow_up) = self.execute(action).await {
                        pending.push_back(follow_up);
                    }
                }
            }
            self.snapshot()
        }
        .instrument(span)
        .await
    }

    /// Runs one transition under the model lock and publishes the result.
    async fn apply(&self, event: FeedEvent) -> Vec<FeedAction> {
        let name = event_name(&event);
        let mut model = self.model.lock().await;
        let from = model.phase;
        let (next, actions) = FeedStateMachine::transition(std::mem::take(&mut *model), event);
        *model = next;
        if from != model.phase {
            info!(from = ?from, to = ?model.phase, event = name, generation = model.generation, "feed state transition");
        }
        self.snapshot_tx.send_replace(model.snapshot());
        actions
    }

    async fn execute(&self, action: FeedAction) -> Option<FeedEvent> {
        match action {
            FeedAction::CancelInFlight => {
                if let Some(previous) = self.in_flight.lock().await.take() {
                    debug!(generation = previous.generation, "cancelling in-flight fetch");
                    previous.token.cancel();
                }
                None
            }
            FeedAction::FetchPage { generation, query } => {
                let entries = self.fetch(generation, &query).await?;
                Some(match entries {
                    Ok(entries) => FeedEvent::PageFetched {
                        generation,
                        entries,
                    },
                    Err(error) => FeedEvent::FetchFailed { generation, error },
                })
            }
            FeedAction::ResolveSpotlight {
                generation,
                id,
                sort_key,
            } => self.resolve_spotlight(generation, id, sort_key).await,
            FeedAction::FetchContext { generation, query } => {
                let entries = self.fetch(generation, &query).await?;
                Some(match entries {
                    Ok(entries) => FeedEvent::ContextFetched {
                        generation,
                        entries,
                    },
                    Err(error) => FeedEvent::FetchFailed { generation, error },
                })
            }
            FeedAction::ResetFilters(reset) => {
                self.events.emit_filters_reset(&reset).await;
                None
            }
            FeedAction::NotifyError(error) => {
                warn!(%error, "entry feed error");
                self.events.emit_feed_error(&error).await;
                None
            }
        }
    }

    /// Fetches a page; `None` when the fetch was superseded.
    async fn fetch(
        &self,
        generation: u64,
        query: &EntryQuery,
    ) -> Option<Result<Vec<EntrySummary>, FeedError>> {
        let token = self.begin_fetch(generation).await?;
        let result = unless_cancelled(&token, self.repo.fetch_entries(query)).await;
        self.finish_fetch(generation).await;
        match result {
            Some(Ok(entries)) => {
                debug!(generation, count = entries.len(), "entries fetched");
                self.cache.insert_many(&entries).await;
                Some(Ok(entries))
            }
            Some(Err(err)) => Some(Err(FeedError::from_page_error(err))),
            None => {
                debug!(generation, "fetch superseded");
                None
            }
        }
    }

    async fn resolve_spotlight(
        &self,
        generation: u64,
        id: EntryId,
        sort_key: SortKey,
    ) -> Option<FeedEvent> {
        let token = self.begin_fetch(generation).await?;
        let result = unless_cancelled(&token, self.cache.get_or_fetch(&id)).await;
        self.finish_fetch(generation).await;
        match result {
            Some(Ok(entry)) => Some(FeedEvent::SpotlightResolved {
                generation,
                anchor: entry.sort_value(sort_key),
            }),
            Some(Err(err)) => Some(FeedEvent::FetchFailed {
                generation,
                error: FeedError::from_spotlight_error(&id, err),
            }),
            None => {
                debug!(generation, entry_id = %id, "spotlight lookup superseded");
                None
            }
        }
    }

    /// Registers the fetch for `generation` and returns its token, or `None`
    /// when a newer event already superseded it.
    async fn begin_fetch(&self, generation: u64) -> Option<CancellationToken> {
        if self.model.lock().await.generation != generation {
            debug!(generation, "skipping stale fetch");
            return None;
        }
        let token = CancellationToken::new();
        let previous = self.in_flight.lock().await.replace(InFlight {
            generation,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            previous.token.cancel();
        }
        Some(token)
    }

    async fn finish_fetch(&self, generation: u64) {
        let mut in_flight = self.in_flight.lock().await;
        if in_flight.as_ref().map(|f| f.generation) == Some(generation) {
            *in_flight = None;
        }
    }
}

fn event_name(event: &FeedEvent) -> &'static str {
    match event {
        FeedEvent::FiltersChanged(_) => "filters_changed",
        FeedEvent::Reload => "reload",
        FeedEvent::LoadMore => "load_more",
        FeedEvent::Spotlight(_) => "spotlight",
        FeedEvent::BackToTop => "back_to_top",
        FeedEvent::PageFetched { .. } => "page_fetched",
        FeedEvent::SpotlightResolved { .. } => "spotlight_resolved",
        FeedEvent::ContextFetched { .. } => "context_fetched",
        FeedEvent::FetchFailed { .. } => "fetch_failed",
    }
}
