pub mod drafts;
pub mod entry_cache;
pub mod feed;
pub mod forms;
pub mod save_user_authorizations;

pub use drafts::DraftStore;
pub use entry_cache::EntryCache;
pub use feed::EntryFeedController;
pub use forms::{LogbookFormStore, UserFormStore};
pub use save_user_authorizations::{SaveUserAuthorizations, SaveUserAuthorizationsError};
