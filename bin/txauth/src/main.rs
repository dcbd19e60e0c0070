#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

//! `txauth` reads newline-delimited JSON events on stdin -- account initialization and
//! transaction events -- and writes one JSON [`AccountState`] snapshot per event to stdout,
//! exactly as admitted or rejected by the authorizer engine.
//!
//! This binary is intentionally thin: it owns argument parsing, wiring, and the stdin/stdout
//! pipeline, and defers every bit of rule evaluation to `txauth-authorizer`.

use std::{io::Write, time::Duration};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use txauth::Engine;
use txauth_authorizer::{
    config::AuthorizerConfig,
    dispatcher::{assign_processing_time, classify, EventDispatcher},
    error::EngineError,
};
use txauth_cli_runner::CliRunner;
use txauth_tracing::Verbosity;

/// Streaming transaction authorizer.
///
/// Reads newline-delimited JSON events on stdin and writes one JSON snapshot per event to stdout.
#[derive(Debug, Parser)]
#[command(name = "txauth", version, about)]
struct Args {
    /// Outer TTL on window entries: an entry untouched this long is reclaimed wholesale.
    #[arg(long, env = "TXAUTH_CACHE_EXPIRATION_INTERVAL", default_value = "30s", value_parser = humantime::parse_duration)]
    cache_expiration_interval: Duration,

    /// Per-pair age horizon for the eviction sweep and the doubled-transaction rule.
    #[arg(long, env = "TXAUTH_EVICTION_INTERVAL", default_value = "120s", value_parser = humantime::parse_duration)]
    eviction_interval: Duration,

    /// Horizon for the high-frequency rule.
    #[arg(long, env = "TXAUTH_HIGH_FREQUENCY_INTERVAL", default_value = "120s", value_parser = humantime::parse_duration)]
    high_frequency_interval: Duration,

    /// Transaction count threshold for the high-frequency rule.
    #[arg(long, env = "TXAUTH_HIGH_FREQUENCY_THRESHOLD", default_value_t = 3)]
    high_frequency_threshold: usize,

    /// Period of the background eviction sweep.
    #[arg(long, env = "TXAUTH_EVICTION_TICK", default_value = "3s", value_parser = humantime::parse_duration)]
    eviction_tick: Duration,

    /// Bound on the number of distinct `(merchant, amount)` keys held by the window at once.
    #[arg(long, env = "TXAUTH_MAX_WINDOW_KEYS", default_value_t = 100)]
    max_window_keys: u64,

    /// Increase logging verbosity; repeat for more (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<&Args> for AuthorizerConfig {
    fn from(args: &Args) -> Self {
        Self {
            cache_expiration_interval: args.cache_expiration_interval,
            eviction_interval: args.eviction_interval,
            high_frequency_interval: args.high_frequency_interval,
            high_frequency_threshold: args.high_frequency_threshold,
            eviction_tick: args.eviction_tick,
            max_window_keys: args.max_window_keys,
        }
    }
}

fn main() -> eyre::Result<()> {
    let args = Args::parse();
    txauth_tracing::init_tracing(Verbosity::from_occurrences(args.verbose))?;

    CliRunner::new().run_until_ctrl_c(run(AuthorizerConfig::from(&args)))
}

/// Builds the engine, spawns the eviction loop, and drives stdin to stdout until EOF.
async fn run(config: AuthorizerConfig) -> eyre::Result<()> {
    let eviction_tick = config.eviction_tick;
    let eviction_interval = config.eviction_interval;
    let engine = Engine::build(config);

    let _eviction = engine.spawn_eviction(eviction_tick, eviction_interval);

    process_stdin(&engine.dispatcher).await.map_err(Into::into)
}

/// Reads one JSON event per line from stdin, dispatches it, and writes the resulting snapshot (if
/// any) to stdout as a single JSON line.
///
/// A line that fails to classify is logged and skipped -- see `ClassifyError`'s doc comment on why
/// that's always safe -- rather than aborting the whole stream over one bad line.
async fn process_stdin(dispatcher: &EventDispatcher) -> Result<(), EngineError> {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();
    let stdout = std::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let event = match classify(&line, assign_processing_time()) {
            Ok(event) => event,
            Err(err) => {
                warn!(target: "txauth", tag = err.tag(), %line, "skipping unprocessable line");
                continue;
            }
        };

        let Some(state) = dispatcher.dispatch(event).await else {
            continue;
        };

        let mut handle = stdout.lock();
        serde_json::to_writer(&mut handle, &state).map_err(std::io::Error::other)?;
        handle.write_all(b"\n")?;
    }

    Ok(())
}
