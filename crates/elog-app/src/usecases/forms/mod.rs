//! In-memory edit forms for the admin screens.

mod logbook_forms;
mod user_forms;

pub use logbook_forms::LogbookFormStore;
pub use user_forms::UserFormStore;
