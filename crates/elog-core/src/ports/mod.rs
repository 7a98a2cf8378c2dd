//! Ports (interfaces) implemented by the infrastructure layer.

pub mod entry_repository;
pub mod errors;
pub mod feed_event;
pub mod kv_store;
pub mod user_authorization;

pub use entry_repository::EntryRepositoryPort;
pub use errors::{EntryRepositoryError, UserAuthorizationError};
pub use feed_event::FeedEventPort;
pub use kv_store::KeyValueStorePort;
pub use user_authorization::UserAuthorizationPort;
