//! Entry feed use case: drives the feed state machine against the backend.

mod cancel;
mod controller;

pub use controller::EntryFeedController;
