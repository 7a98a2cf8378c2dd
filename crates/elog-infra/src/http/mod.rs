//! REST backend adapters.

pub mod client;
pub mod entries;
pub mod users;

pub use client::{ApiClient, ApiClientConfig, ApiError};
pub use entries::HttpEntryRepository;
pub use users::HttpUserAuthorizationRepository;
