//! Logbook and user administration models.

pub mod logbook;
pub mod user;

pub use logbook::{Logbook, LogbookForm, Shift, Tag, TagDraft};
pub use user::{AuthorizationType, User, UserForm, UserLogbookAuthorization};
