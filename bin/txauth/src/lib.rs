#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

//! Wiring shared between the `txauth` binary and its tests: building the engine and, for tests
//! only, a `run_lines` harness that drives it without real stdin/stdout.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use txauth_authorizer::{
    config::AuthorizerConfig,
    dispatcher::{assign_processing_time, classify, EventDispatcher},
    eviction::spawn_eviction_loop,
    store::AccountStore,
    window::TransactionWindow,
};

/// The dispatcher plus a handle on the window it shares with the eviction loop.
#[derive(Debug)]
pub struct Engine {
    pub dispatcher: EventDispatcher,
    window: Arc<TransactionWindow>,
}

impl Engine {
    pub fn build(config: AuthorizerConfig) -> Self {
        let window = Arc::new(TransactionWindow::new(
            config.max_window_keys,
            config.cache_expiration_interval,
        ));
        let store = Arc::new(AccountStore::new());
        let dispatcher = EventDispatcher::new(store, window.clone(), config);
        Self { dispatcher, window }
    }

    /// Spawns the background eviction sweep over this engine's window.
    pub fn spawn_eviction(&self, tick: Duration, eviction_interval: Duration) -> JoinHandle<()> {
        spawn_eviction_loop(self.window.clone(), tick, eviction_interval)
    }
}

/// Feeds `lines` through classify -> dispatch -> serialize, in order, without touching real
/// stdin/stdout or spawning the eviction loop.
///
/// Lines that fail to classify, and `Start` events, contribute no entry to the result -- matching
/// exactly what would (and wouldn't) reach stdout in the real pipeline.
pub async fn run_lines(lines: &[&str], config: AuthorizerConfig) -> Vec<String> {
    let engine = Engine::build(config);
    let mut out = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let Ok(event) = classify(line, assign_processing_time()) else { continue };
        let Some(state) = engine.dispatcher.dispatch(event).await else { continue };
        out.push(serde_json::to_string(&state).expect("AccountState always serializes"));
    }

    out
}
