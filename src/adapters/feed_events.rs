//! Logging adapter for the entry feed's outbound notifications.

use std::sync::Mutex;

use async_trait::async_trait;
use elog_core::feed::query_string::to_query_pairs;
use elog_core::ports::FeedEventPort;
use elog_core::{FeedError, FilterReset};

use crate::cli::encode_query;

/// Logs feed errors and keeps the query string the feed last asked for.
///
/// Stands in for a URL layer when running headless.
#[derive(Default)]
pub struct LoggingFeedEventEmitter {
    last_query: Mutex<Option<String>>,
}

impl LoggingFeedEventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query string from the most recent filter reset, if any.
    pub fn last_query(&self) -> Option<String> {
        self.last_query
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl FeedEventPort for LoggingFeedEventEmitter {
    async fn emit_feed_error(&self, error: &FeedError) {
        tracing::error!(%error, "Entry feed error");
    }

    async fn emit_filters_reset(&self, reset: &FilterReset) {
        let query = encode_query(&to_query_pairs(&reset.filters));
        tracing::info!(query = %query, preserve_history = reset.preserve_history, "Filters reset");
        *self
            .last_query
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(query);
    }
}
