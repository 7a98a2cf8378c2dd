//! # elog-core
//!
//! Core domain models and business logic for the logbook client.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod admin;
pub mod config;
pub mod entry;
pub mod feed;
pub mod ids;
pub mod ports;
pub mod time;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use entry::{Entry, EntryForm, EntrySummary};
pub use feed::{
    FeedAction, FeedError, FeedEvent, FeedModel, FeedPhase, FeedSnapshot, FeedStateMachine,
    FeedWindow, FilterReset, FilterState, SortKey, ENTRIES_PER_FETCH,
};
pub use ids::{AttachmentId, EntryId, LogbookId, TagId, UserId};
pub use time::Timestamp;
