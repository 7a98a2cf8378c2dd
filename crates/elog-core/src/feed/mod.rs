//! Entry feed domain module.
//!
//! This module defines the entry list window, its filters, and the pure
//! pagination / spotlight state machine that drives it.

pub mod error;
pub mod filter;
pub mod query;
pub mod query_string;
pub mod snapshot;
pub mod state_machine;
pub mod window;

pub use error::FeedError;
pub use filter::{FilterReset, FilterState, SortKey};
pub use query::EntryQuery;
pub use snapshot::FeedSnapshot;
pub use state_machine::{FeedAction, FeedEvent, FeedModel, FeedPhase, FeedStateMachine};
pub use window::FeedWindow;

/// Entries requested per page, and per side of a spotlight context window.
pub const ENTRIES_PER_FETCH: usize = 25;
