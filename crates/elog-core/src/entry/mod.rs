//! Log entry models.

pub mod draft;
pub mod summary;

pub use draft::EntryForm;
pub use summary::{AttachmentRef, Entry, EntrySummary, TagRef};
