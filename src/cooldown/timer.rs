//! Deferred reset primitive used for cooldown expiry.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Run `reset` once `after` has elapsed.
///
/// Runs on the tokio clock, so tests using a paused runtime drive expiry
/// with `tokio::time::advance`. Aborting the returned handle cancels the
/// reset if it has not run yet.
pub fn schedule<F>(after: Duration, reset: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        reset();
    })
}
