#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

//! A small runner that owns the tokio runtime for the `txauth` binary and races the pipeline's
//! main future against ctrl-c.
//!
//! A fuller version of this would hand callers a `TaskExecutor` so arbitrarily many spawned
//! subsystems could be tracked and shut down as a group. `txauth` only ever spawns two long-lived
//! tasks (the eviction loop and the stdin pipeline) directly from `main`, so that extra layer of
//! indirection was left out.

use std::future::Future;

/// Owns a multi-threaded tokio runtime for the duration of one call to
/// [`CliRunner::run_until_ctrl_c`].
#[derive(Debug, Default)]
pub struct CliRunner;

impl CliRunner {
    pub fn new() -> Self {
        Self
    }

    /// Builds a multi-threaded tokio runtime, then runs `fut` to completion on it -- unless
    /// ctrl-c (or, on unix, SIGTERM) arrives first, in which case this returns `Ok(())` early and
    /// lets the runtime (and everything spawned on it) drop.
    pub fn run_until_ctrl_c<F>(self, fut: F) -> eyre::Result<()>
    where
        F: Future<Output = eyre::Result<()>>,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

        runtime.block_on(async move {
            tokio::select! {
                result = fut => result,
                _ = shutdown_signal() => {
                    tracing::info!(target: "txauth::cli", "shutdown signal received");
                    Ok(())
                }
            }
        })
    }
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigterm.recv() => {},
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
