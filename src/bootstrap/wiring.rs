//! # Dependency Injection / 依赖注入模块
//!
//! Builds the infra adapters and hands them to the use cases as port trait
//! objects. Zero values in [`AppConfig`] are replaced by defaults here, and
//! nowhere else.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use elog_app::usecases::{
    DraftStore, EntryCache, EntryFeedController, LogbookFormStore, SaveUserAuthorizations,
    UserFormStore,
};
use elog_core::config::AppConfig;
use elog_core::ports::{EntryRepositoryPort, KeyValueStorePort, UserAuthorizationPort};
use elog_core::ENTRIES_PER_FETCH;
use elog_infra::{
    ApiClient, ApiClientConfig, FileKeyValueStore, HttpEntryRepository,
    HttpUserAuthorizationRepository, MemoryKeyValueStore,
};

use crate::adapters::LoggingFeedEventEmitter;

pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8080/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Everything the client surfaces need, fully wired.
pub struct ClientDeps {
    pub feed: Arc<EntryFeedController>,
    pub entry_cache: Arc<EntryCache>,
    pub drafts: Arc<DraftStore>,
    pub logbook_forms: Arc<LogbookFormStore>,
    pub user_forms: Arc<UserFormStore>,
    pub save_user_authorizations: Arc<SaveUserAuthorizations>,
    pub feed_events: Arc<LoggingFeedEventEmitter>,
}

/// Directory for persisted client state: the configured one, else the
/// platform data directory.
pub fn resolve_data_dir(config: &AppConfig) -> Option<PathBuf> {
    if !config.data_dir.as_os_str().is_empty() {
        return Some(config.data_dir.clone());
    }
    dirs::data_local_dir().map(|dir| dir.join("elog"))
}

fn api_client_config(config: &AppConfig) -> ApiClientConfig {
    ApiClientConfig {
        base_url: if config.api_endpoint.is_empty() {
            DEFAULT_API_ENDPOINT.to_string()
        } else {
            config.api_endpoint.clone()
        },
        timeout: Duration::from_secs(match config.request_timeout_secs {
            0 => DEFAULT_TIMEOUT_SECS,
            secs => secs,
        }),
        retry_attempts: config.retry_attempts,
        retry_backoff: Duration::from_millis(match config.retry_backoff_ms {
            0 => DEFAULT_RETRY_BACKOFF_MS,
            ms => ms,
        }),
    }
}

fn page_size(config: &AppConfig) -> usize {
    match config.page_size {
        0 => ENTRIES_PER_FETCH,
        n => n,
    }
}

fn key_value_store(config: &AppConfig) -> Arc<dyn KeyValueStorePort> {
    match resolve_data_dir(config) {
        Some(dir) => {
            let store = FileKeyValueStore::new(dir);
            info!(dir = %store.dir().display(), "Persisting drafts to disk");
            Arc::new(store)
        }
        None => {
            warn!("No data directory available, drafts will not survive a restart");
            Arc::new(MemoryKeyValueStore::new())
        }
    }
}

pub async fn wire_dependencies(config: &AppConfig) -> anyhow::Result<ClientDeps> {
    let client = Arc::new(
        ApiClient::new(api_client_config(config)).context("Failed to build API client")?,
    );
    info!(endpoint = %client.base_url(), "API client ready");

    let entries: Arc<dyn EntryRepositoryPort> = Arc::new(HttpEntryRepository::new(client.clone()));
    let grants: Arc<dyn UserAuthorizationPort> =
        Arc::new(HttpUserAuthorizationRepository::new(client));

    let entry_cache = Arc::new(EntryCache::new(entries.clone()));
    let feed_events = Arc::new(LoggingFeedEventEmitter::new());
    let feed = Arc::new(EntryFeedController::new(
        entries,
        entry_cache.clone(),
        feed_events.clone(),
        page_size(config),
    ));

    let drafts = Arc::new(
        DraftStore::load(key_value_store(config))
            .await
            .context("Failed to load drafts")?,
    );

    let user_forms = Arc::new(UserFormStore::new());
    let save_user_authorizations =
        Arc::new(SaveUserAuthorizations::new(grants, user_forms.clone()));

    Ok(ClientDeps {
        feed,
        entry_cache,
        drafts,
        logbook_forms: Arc::new(LogbookFormStore::new()),
        user_forms,
        save_user_authorizations,
        feed_events,
    })
}
