//! Races in-flight fetches against their cancellation token.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Runs `fut` until it completes or `token` fires; `None` means cancelled.
/// A token that is already cancelled wins over a ready future.
pub(super) async fn unless_cancelled<F: Future>(
    token: &CancellationToken,
    fut: F,
) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        out = fut => Some(out),
    }
}
