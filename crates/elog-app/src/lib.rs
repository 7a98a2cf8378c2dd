//! Logbook client application orchestration layer
//!
//! This crate contains the use cases that drive the core state machines and
//! talk to the ports.

pub mod usecases;

pub use usecases::{DraftStore, EntryCache, EntryFeedController};
