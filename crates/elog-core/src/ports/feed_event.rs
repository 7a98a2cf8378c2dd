use crate::feed::{FeedError, FilterReset};

/// Outbound notifications from the entry feed to the view and URL layers.
#[async_trait::async_trait]
pub trait FeedEventPort: Send + Sync {
    /// Transient, user-visible failure notice.
    async fn emit_feed_error(&self, error: &FeedError);

    /// The feed replaced its filters; the query string should follow.
    async fn emit_filters_reset(&self, reset: &FilterReset);
}
