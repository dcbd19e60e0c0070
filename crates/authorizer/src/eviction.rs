//! The background eviction loop.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tracing::trace;

use crate::window::TransactionWindow;

/// Spawns a daemon task that calls [`TransactionWindow::evict_expired`] every `tick`.
///
/// The returned handle is a plain `tokio::task::JoinHandle`; dropping it (rather than awaiting or
/// aborting it) lets the task keep running until the runtime itself shuts down, which is exactly
/// what we want for a background sweep with no graceful-shutdown obligations of its own.
pub fn spawn_eviction_loop(
    window: Arc<TransactionWindow>,
    tick: Duration,
    eviction_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        // The first tick fires immediately; skip it so we don't evict before anything could
        // plausibly have expired.
        interval.tick().await;
        loop {
            interval.tick().await;
            window.evict_expired(eviction_interval);
            trace!(target: "txauth::eviction", size = window.size(), "eviction sweep complete");
        }
    })
}
