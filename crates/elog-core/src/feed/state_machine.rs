//! Entry feed state machine.
//!
//! Defines a pure state transition function for the paginated entry list and
//! its spotlight (deep-link) mode. Fetches are requested as actions; their
//! results come back as events tagged with the generation that issued them,
//! and results from a superseded generation are dropped.

use serde::{Deserialize, Serialize};

use crate::entry::EntrySummary;
use crate::feed::{
    EntryQuery, FeedError, FeedSnapshot, FeedWindow, FilterReset, FilterState, SortKey,
    ENTRIES_PER_FETCH,
};
use crate::ids::EntryId;
use crate::time::Timestamp;

/// Feed lifecycle phase.
///
/// 列表生命周期阶段。Exhaustion is tracked separately in [`FeedModel::exhausted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedPhase {
    Idle,
    /// First page under the current filters is in flight.
    Loading,
    Loaded,
    LoadingMore,
    /// Resolving the spotlight target or fetching its context window.
    SpotlightLoading,
    /// Window holds the context around a spotlighted entry.
    SpotlightLoaded,
}

impl FeedPhase {
    pub fn is_loading(self) -> bool {
        matches!(
            self,
            FeedPhase::Loading | FeedPhase::LoadingMore | FeedPhase::SpotlightLoading
        )
    }
}

/// Events that drive the feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Query-string filters changed (or were applied for the first time).
    FiltersChanged(FilterState),
    /// Re-run the first page under the current filters.
    Reload,
    /// The bottom of the list became visible.
    LoadMore,
    /// Navigation asks for an entry to be revealed.
    Spotlight(EntryId),
    /// Leave spotlight mode and return to the newest entries.
    BackToTop,
    PageFetched {
        generation: u64,
        entries: Vec<EntrySummary>,
    },
    SpotlightResolved {
        generation: u64,
        anchor: Timestamp,
    },
    ContextFetched {
        generation: u64,
        entries: Vec<EntrySummary>,
    },
    FetchFailed {
        generation: u64,
        error: FeedError,
    },
}

/// Side-effects produced by state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedAction {
    /// Abandon whatever fetch is in flight.
    CancelInFlight,
    FetchPage {
        generation: u64,
        query: EntryQuery,
    },
    /// Look up the spotlight target's timestamp under `sort_key`.
    ResolveSpotlight {
        generation: u64,
        id: EntryId,
        sort_key: SortKey,
    },
    FetchContext {
        generation: u64,
        query: EntryQuery,
    },
    ResetFilters(FilterReset),
    NotifyError(FeedError),
}

/// Complete feed state owned by one controller.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedModel {
    pub phase: FeedPhase,
    pub filters: FilterState,
    pub window: FeedWindow,
    pub exhausted: bool,
    /// Bumped on every triggering event; completions must carry the current value.
    pub generation: u64,
    pub page_size: usize,
    pub pending_spotlight: Option<EntryId>,
    /// Timestamp of the pending spotlight target once resolved.
    pub spotlight_anchor: Option<Timestamp>,
    /// Last spotlight request that was handled.
    pub last_spotlight: Option<EntryId>,
    /// Phase to fall back to when the in-flight fetch fails.
    resume_phase: FeedPhase,
}

impl Default for FeedModel {
    fn default() -> Self {
        Self::new(ENTRIES_PER_FETCH)
    }
}

impl FeedModel {
    pub fn new(page_size: usize) -> Self {
        Self {
            phase: FeedPhase::Idle,
            filters: FilterState::default(),
            window: FeedWindow::default(),
            exhausted: false,
            generation: 0,
            page_size: page_size.max(1),
            pending_spotlight: None,
            spotlight_anchor: None,
            last_spotlight: None,
            resume_phase: FeedPhase::Idle,
        }
    }

    /// Whether the window currently shows a spotlight context.
    pub fn in_spotlight(&self) -> bool {
        self.phase == FeedPhase::SpotlightLoaded
            || (self.phase == FeedPhase::LoadingMore
                && self.resume_phase == FeedPhase::SpotlightLoaded)
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let in_spotlight = self.in_spotlight();
        FeedSnapshot {
            entries: self.window.entries().to_vec(),
            is_loading: self.phase.is_loading(),
            reached_bottom: self.exhausted,
            phase: self.phase,
            spotlight: if in_spotlight {
                self.last_spotlight.clone()
            } else {
                None
            },
            show_back_to_top: in_spotlight,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Phase that is safe to return to if the in-flight fetch is abandoned.
    fn stable_phase(&self) -> FeedPhase {
        match self.phase {
            FeedPhase::Idle | FeedPhase::Loaded | FeedPhase::SpotlightLoaded => self.phase,
            // The window was cleared when the initial load started.
            FeedPhase::Loading => FeedPhase::Idle,
            FeedPhase::LoadingMore | FeedPhase::SpotlightLoading => self.resume_phase,
        }
    }

    /// Clears the window and requests the first page under `filters`.
    fn start_initial_load(&mut self, filters: FilterState) -> FeedAction {
        let generation = self.next_generation();
        self.filters = filters;
        self.window.clear();
        self.exhausted = false;
        self.pending_spotlight = None;
        self.spotlight_anchor = None;
        self.phase = FeedPhase::Loading;
        self.resume_phase = FeedPhase::Idle;
        FeedAction::FetchPage {
            generation,
            query: EntryQuery::first_page(&self.filters, self.page_size),
        }
    }
}

/// Pure feed state machine.
///
/// 纯状态机：不包含副作用。
pub struct FeedStateMachine;

impl FeedStateMachine {
    pub fn transition(mut model: FeedModel, event: FeedEvent) -> (FeedModel, Vec<FeedAction>) {
        match event {
            FeedEvent::FiltersChanged(filters) => {
                if model.phase != FeedPhase::Idle
                    && filters.fingerprint() == model.filters.fingerprint()
                {
                    return (model, Vec::new());
                }
                let fetch = model.start_initial_load(filters);
                (model, vec![FeedAction::CancelInFlight, fetch])
            }
            FeedEvent::Reload => {
                let filters = model.filters.clone();
                let fetch = model.start_initial_load(filters);
                (model, vec![FeedAction::CancelInFlight, fetch])
            }
            FeedEvent::LoadMore => {
                let can_load = matches!(model.phase, FeedPhase::Loaded | FeedPhase::SpotlightLoaded)
                    && !model.exhausted;
                let Some(cursor) = model.window.cursor().filter(|_| can_load) else {
                    return (model, Vec::new());
                };
                let generation = model.next_generation();
                model.resume_phase = model.phase;
                model.phase = FeedPhase::LoadingMore;
                let query = EntryQuery::next_page(&model.filters, cursor, model.page_size);
                (model, vec![FeedAction::FetchPage { generation, query }])
            }
            FeedEvent::Spotlight(id) => {
                if model.window.contains(&id)
                    || model.last_spotlight.as_ref() == Some(&id)
                    || model.pending_spotlight.as_ref() == Some(&id)
                {
                    return (model, Vec::new());
                }
                let resume = model.stable_phase();
                let generation = model.next_generation();
                model.resume_phase = resume;
                model.phase = FeedPhase::SpotlightLoading;
                model.pending_spotlight = Some(id.clone());
                model.spotlight_anchor = None;
                let sort_key = FilterState::default().sort_key();
                (
                    model,
                    vec![
                        FeedAction::CancelInFlight,
                        FeedAction::ResolveSpotlight {
                            generation,
                            id,
                            sort_key,
                        },
                    ],
                )
            }
            FeedEvent::BackToTop => {
                if model.phase != FeedPhase::SpotlightLoaded {
                    return (model, Vec::new());
                }
                model.last_spotlight = None;
                let fetch = model.start_initial_load(FilterState::default());
                let reset = FeedAction::ResetFilters(FilterReset {
                    filters: FilterState::default(),
                    preserve_history: false,
                });
                (model, vec![FeedAction::CancelInFlight, reset, fetch])
            }
            FeedEvent::PageFetched {
                generation,
                entries,
            } => {
                if generation != model.generation {
                    return (model, Vec::new());
                }
                let short_page = entries.len() < model.page_size;
                match model.phase {
                    FeedPhase::Loading => {
                        let key = model.filters.sort_key();
                        model.window.replace(entries, key);
                        model.exhausted = short_page;
                        model.phase = FeedPhase::Loaded;
                    }
                    FeedPhase::LoadingMore => {
                        model.window.append(entries);
                        model.exhausted = short_page;
                        model.phase = model.resume_phase;
                    }
                    _ => {}
                }
                (model, Vec::new())
            }
            FeedEvent::SpotlightResolved { generation, anchor } => {
                if generation != model.generation || model.phase != FeedPhase::SpotlightLoading {
                    return (model, Vec::new());
                }
                model.spotlight_anchor = Some(anchor);
                let query = EntryQuery::context(&FilterState::default(), anchor, model.page_size);
                (model, vec![FeedAction::FetchContext { generation, query }])
            }
            FeedEvent::ContextFetched {
                generation,
                entries,
            } => {
                if generation != model.generation || model.phase != FeedPhase::SpotlightLoading {
                    return (model, Vec::new());
                }
                let filters = FilterState::default();
                let key = filters.sort_key();
                // The `limit` half is everything at or before the anchor. The
                // backend may place the anchor entry itself in either half, so
                // it is counted here; a wrong guess costs one empty page.
                let limit_half = match model.spotlight_anchor {
                    Some(anchor) => entries
                        .iter()
                        .filter(|e| e.sort_value(key) <= anchor)
                        .count(),
                    None => entries.len(),
                };
                model.window.replace(entries, key);
                model.exhausted = limit_half < model.page_size;
                model.filters = filters.clone();
                model.last_spotlight = model.pending_spotlight.take();
                model.spotlight_anchor = None;
                model.phase = FeedPhase::SpotlightLoaded;
                (
                    model,
                    vec![FeedAction::ResetFilters(FilterReset {
                        filters,
                        preserve_history: true,
                    })],
                )
            }
            FeedEvent::FetchFailed { generation, error } => {
                if generation != model.generation || !model.phase.is_loading() {
                    return (model, Vec::new());
                }
                if let FeedError::SpotlightNotFound(id) = &error {
                    if model.phase == FeedPhase::SpotlightLoading {
                        model.last_spotlight = Some(id.clone());
                        let fetch = model.start_initial_load(FilterState::default());
                        let reset = FeedAction::ResetFilters(FilterReset {
                            filters: FilterState::default(),
                            preserve_history: false,
                        });
                        return (model, vec![FeedAction::NotifyError(error), reset, fetch]);
                    }
                }
                model.phase = model.stable_phase();
                model.pending_spotlight = None;
                model.spotlight_anchor = None;
                (model, vec![FeedAction::NotifyError(error)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::LogbookId;
    use chrono::NaiveDate;

    fn entry(id: &str, ms: i64) -> EntrySummary {
        EntrySummary {
            id: EntryId::from(id),
            logged_at: Timestamp::from_millis(ms),
            event_at: Timestamp::from_millis(ms),
            title: id.to_string(),
            logbook_id: LogbookId::from("L1"),
            tags: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// `count` entries named `{prefix}{n}`, newest first, starting at `newest_ms`.
    fn page(prefix: &str, count: usize, newest_ms: i64) -> Vec<EntrySummary> {
        (0..count)
            .map(|n| entry(&format!("{prefix}{n}"), newest_ms - n as i64 * 1000))
            .collect()
    }

    fn logbook_filter(id: &str) -> FilterState {
        FilterState {
            logbooks: [LogbookId::from(id)].into_iter().collect(),
            ..FilterState::default()
        }
    }

    fn fetch_generation(actions: &[FeedAction]) -> u64 {
        actions
            .iter()
            .find_map(|a| match a {
                FeedAction::FetchPage { generation, .. }
                | FeedAction::FetchContext { generation, .. }
                | FeedAction::ResolveSpotlight { generation, .. } => Some(*generation),
                _ => None,
            })
            .expect("a fetch action")
    }

    fn loaded(filters: FilterState, entries: Vec<EntrySummary>) -> FeedModel {
        let (model, actions) =
            FeedStateMachine::transition(FeedModel::default(), FeedEvent::FiltersChanged(filters));
        let generation = fetch_generation(&actions);
        let (model, _) =
            FeedStateMachine::transition(model, FeedEvent::PageFetched { generation, entries });
        model
    }

    #[test]
    fn filter_change_clears_window_and_fetches_first_page() {
        let model = loaded(logbook_filter("L1"), page("A", 25, 1_000_000));
        assert_eq!(model.window.len(), 25);

        let (model, actions) =
            FeedStateMachine::transition(model, FeedEvent::FiltersChanged(logbook_filter("L2")));
        assert!(model.window.is_empty());
        assert_eq!(model.phase, FeedPhase::Loading);
        assert!(!model.exhausted);
        assert_eq!(actions[0], FeedAction::CancelInFlight);
        assert!(matches!(
            &actions[1],
            FeedAction::FetchPage { query, .. } if query.limit == 25 && query.logbooks == vec![LogbookId::from("L2")]
        ));
    }

    #[test]
    fn end_date_is_normalized_in_first_page_query() {
        let filters = FilterState {
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5),
            ..FilterState::default()
        };
        let (_, actions) =
            FeedStateMachine::transition(FeedModel::default(), FeedEvent::FiltersChanged(filters));
        let FeedAction::FetchPage { query, .. } = &actions[1] else {
            panic!("expected a page fetch");
        };
        assert_eq!(
            query.before.map(|ts| ts.to_rfc3339()).as_deref(),
            Some("2024-01-05T23:59:59.999Z")
        );
    }

    #[test]
    fn unchanged_filters_are_ignored_once_loaded() {
        let model = loaded(logbook_filter("L1"), page("A", 25, 1_000_000));
        let (model, actions) =
            FeedStateMachine::transition(model, FeedEvent::FiltersChanged(logbook_filter("L1")));
        assert!(actions.is_empty());
        assert_eq!(model.window.len(), 25);
    }

    #[test]
    fn short_page_marks_exhausted_and_blocks_load_more() {
        let model = loaded(logbook_filter("L1"), page("A", 25, 1_000_000));
        assert!(!model.exhausted);

        let (model, actions) = FeedStateMachine::transition(model, FeedEvent::LoadMore);
        assert_eq!(model.phase, FeedPhase::LoadingMore);
        let generation = fetch_generation(&actions);
        let FeedAction::FetchPage { query, .. } = &actions[0] else {
            panic!("expected a page fetch");
        };
        assert_eq!(query.before, model.window.cursor());

        let (model, _) = FeedStateMachine::transition(
            model,
            FeedEvent::PageFetched {
                generation,
                entries: page("B", 10, 900_000),
            },
        );
        assert_eq!(model.phase, FeedPhase::Loaded);
        assert!(model.exhausted);
        assert_eq!(model.window.len(), 35);

        let (model, actions) = FeedStateMachine::transition(model, FeedEvent::LoadMore);
        assert!(actions.is_empty());
        assert_eq!(model.phase, FeedPhase::Loaded);
    }

    #[test]
    fn load_more_is_ignored_while_loading() {
        let (model, _) = FeedStateMachine::transition(
            FeedModel::default(),
            FeedEvent::FiltersChanged(FilterState::default()),
        );
        let (model, actions) = FeedStateMachine::transition(model, FeedEvent::LoadMore);
        assert!(actions.is_empty());
        assert_eq!(model.phase, FeedPhase::Loading);
    }

    #[test]
    fn stale_page_is_discarded() {
        let (model, first) = FeedStateMachine::transition(
            FeedModel::default(),
            FeedEvent::FiltersChanged(logbook_filter("L1")),
        );
        let stale = fetch_generation(&first);
        let (model, second) =
            FeedStateMachine::transition(model, FeedEvent::FiltersChanged(logbook_filter("L2")));
        let current = fetch_generation(&second);

        let (model, _) = FeedStateMachine::transition(
            model,
            FeedEvent::PageFetched {
                generation: current,
                entries: page("B", 3, 1_000),
            },
        );
        let (model, actions) = FeedStateMachine::transition(
            model,
            FeedEvent::PageFetched {
                generation: stale,
                entries: page("A", 3, 2_000),
            },
        );
        assert!(actions.is_empty());
        assert!(model.window.entries().iter().all(|e| e.id.as_ref().starts_with('B')));
    }

    #[test]
    fn spotlight_outside_window_loads_context_and_resets_filters_once() {
        let model = loaded(logbook_filter("L1"), page("A", 25, 1_000_000));
        let (model, actions) =
            FeedStateMachine::transition(model, FeedEvent::Spotlight(EntryId::from("E9")));
        assert_eq!(model.phase, FeedPhase::SpotlightLoading);
        assert!(matches!(
            &actions[1],
            FeedAction::ResolveSpotlight { id, sort_key: SortKey::EventAt, .. } if id.as_ref() == "E9"
        ));
        let generation = fetch_generation(&actions);
        let anchor = Timestamp::from_millis(500_000);

        let (model, actions) = FeedStateMachine::transition(
            model,
            FeedEvent::SpotlightResolved { generation, anchor },
        );
        let FeedAction::FetchContext { query, .. } = &actions[0] else {
            panic!("expected a context fetch");
        };
        assert_eq!(query.context_size, Some(25));
        assert_eq!(query.before, Some(anchor));

        let mut context = page("N", 25, 525_000);
        context.push(entry("E9", 500_000));
        context.extend(page("O", 25, 499_000));
        let (model, actions) = FeedStateMachine::transition(
            model,
            FeedEvent::ContextFetched {
                generation,
                entries: context,
            },
        );
        assert_eq!(model.phase, FeedPhase::SpotlightLoaded);
        assert_eq!(model.window.len(), 51);
        assert!(model.window.contains(&EntryId::from("E9")));
        assert!(!model.window.contains(&EntryId::from("A0")));
        assert!(!model.exhausted);
        assert!(model.filters.is_default());
        let resets: Vec<_> = actions
            .iter()
            .filter(|a| matches!(a, FeedAction::ResetFilters(r) if r.preserve_history))
            .collect();
        assert_eq!(resets.len(), 1);

        let snapshot = model.snapshot();
        assert!(snapshot.show_back_to_top);
        assert_eq!(snapshot.spotlight, Some(EntryId::from("E9")));
    }

    fn spotlight_with_context(context: Vec<EntrySummary>) -> FeedModel {
        let model = loaded(logbook_filter("L1"), page("A", 25, 1_000_000));
        let (model, actions) =
            FeedStateMachine::transition(model, FeedEvent::Spotlight(EntryId::from("E9")));
        let generation = fetch_generation(&actions);
        let (model, _) = FeedStateMachine::transition(
            model,
            FeedEvent::SpotlightResolved {
                generation,
                anchor: Timestamp::from_millis(500_000),
            },
        );
        let (model, _) = FeedStateMachine::transition(
            model,
            FeedEvent::ContextFetched {
                generation,
                entries: context,
            },
        );
        model
    }

    #[test]
    fn anchor_counts_toward_a_full_older_half() {
        let mut context = page("N", 25, 525_000);
        context.push(entry("E9", 500_000));
        context.extend(page("O", 24, 499_000));
        let model = spotlight_with_context(context);
        assert_eq!(model.phase, FeedPhase::SpotlightLoaded);
        assert!(!model.snapshot().reached_bottom);

        let mut context = page("N", 25, 525_000);
        context.push(entry("E9", 500_000));
        context.extend(page("O", 10, 499_000));
        let model = spotlight_with_context(context);
        assert!(model.snapshot().reached_bottom);
    }

    #[test]
    fn spotlight_already_in_window_is_a_no_op() {
        let model = loaded(logbook_filter("L1"), page("A", 25, 1_000_000));
        let (model, actions) =
            FeedStateMachine::transition(model, FeedEvent::Spotlight(EntryId::from("A3")));
        assert!(actions.is_empty());
        assert_eq!(model.phase, FeedPhase::Loaded);
    }

    #[test]
    fn spotlight_not_found_falls_back_to_default_feed() {
        let model = loaded(logbook_filter("L1"), page("A", 25, 1_000_000));
        let (model, actions) =
            FeedStateMachine::transition(model, FeedEvent::Spotlight(EntryId::from("E404")));
        let generation = fetch_generation(&actions);
        let (model, actions) = FeedStateMachine::transition(
            model,
            FeedEvent::FetchFailed {
                generation,
                error: FeedError::SpotlightNotFound(EntryId::from("E404")),
            },
        );
        assert_eq!(model.phase, FeedPhase::Loading);
        assert!(model.filters.is_default());
        assert!(matches!(actions[0], FeedAction::NotifyError(_)));
        assert!(matches!(&actions[1], FeedAction::ResetFilters(r) if !r.preserve_history));
        assert!(matches!(actions[2], FeedAction::FetchPage { .. }));

        // The same request is not retried.
        let (_, actions) =
            FeedStateMachine::transition(model, FeedEvent::Spotlight(EntryId::from("E404")));
        assert!(actions.is_empty());
    }

    #[test]
    fn network_failure_keeps_window_and_restores_phase() {
        let model = loaded(logbook_filter("L1"), page("A", 25, 1_000_000));
        let (model, actions) = FeedStateMachine::transition(model, FeedEvent::LoadMore);
        let generation = fetch_generation(&actions);
        let (model, actions) = FeedStateMachine::transition(
            model,
            FeedEvent::FetchFailed {
                generation,
                error: FeedError::NetworkFailure("timeout".into()),
            },
        );
        assert_eq!(model.phase, FeedPhase::Loaded);
        assert_eq!(model.window.len(), 25);
        assert_eq!(
            actions,
            vec![FeedAction::NotifyError(FeedError::NetworkFailure(
                "timeout".into()
            ))]
        );
    }

    #[test]
    fn failed_initial_load_returns_to_idle() {
        let (model, actions) = FeedStateMachine::transition(
            FeedModel::default(),
            FeedEvent::FiltersChanged(FilterState::default()),
        );
        let generation = fetch_generation(&actions);
        let (model, _) = FeedStateMachine::transition(
            model,
            FeedEvent::FetchFailed {
                generation,
                error: FeedError::NetworkFailure("down".into()),
            },
        );
        assert_eq!(model.phase, FeedPhase::Idle);

        // Same filters can be retried from idle.
        let (_, actions) = FeedStateMachine::transition(
            model,
            FeedEvent::FiltersChanged(FilterState::default()),
        );
        assert!(matches!(actions[1], FeedAction::FetchPage { .. }));
    }

    #[test]
    fn back_to_top_only_applies_in_spotlight() {
        let model = loaded(logbook_filter("L1"), page("A", 25, 1_000_000));
        let (model, actions) = FeedStateMachine::transition(model, FeedEvent::BackToTop);
        assert!(actions.is_empty());
        assert_eq!(model.phase, FeedPhase::Loaded);

        let mut model = model;
        model.phase = FeedPhase::SpotlightLoaded;
        model.last_spotlight = Some(EntryId::from("E9"));
        let (model, actions) = FeedStateMachine::transition(model, FeedEvent::BackToTop);
        assert_eq!(model.phase, FeedPhase::Loading);
        assert!(model.window.is_empty());
        assert!(model.last_spotlight.is_none());
        assert!(matches!(&actions[1], FeedAction::ResetFilters(r) if !r.preserve_history));
        assert!(matches!(actions[2], FeedAction::FetchPage { .. }));
    }

    #[test]
    fn load_more_in_spotlight_stays_in_spotlight() {
        let mut model = loaded(FilterState::default(), page("A", 25, 1_000_000));
        model.phase = FeedPhase::SpotlightLoaded;
        let (model, actions) = FeedStateMachine::transition(model, FeedEvent::LoadMore);
        assert!(model.snapshot().show_back_to_top);
        let generation = fetch_generation(&actions);
        let (model, _) = FeedStateMachine::transition(
            model,
            FeedEvent::PageFetched {
                generation,
                entries: page("B", 25, 900_000),
            },
        );
        assert_eq!(model.phase, FeedPhase::SpotlightLoaded);
        assert_eq!(model.window.len(), 50);
    }
}
