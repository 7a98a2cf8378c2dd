//! # elog-infra
//!
//! Adapters for the logbook client ports: the REST backend over reqwest and
//! local key-value storage for drafts.

pub mod http;
pub mod storage;

pub use http::{ApiClient, ApiClientConfig, ApiError, HttpEntryRepository, HttpUserAuthorizationRepository};
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
