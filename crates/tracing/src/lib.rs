#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

//! Logging initialization for the `txauth` binary.
//!
//! Everything the engine logs goes to stderr, via [`tracing`]; stdout is reserved for protocol
//! output (one JSON [`txauth_authorizer::account::AccountState`] per admitted event), so the two
//! can never interleave on the same stream.

use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Verbosity levels selectable via repeated `-v` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Default)]
pub enum Verbosity {
    #[default]
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    /// Picks a verbosity from a `-v` repeat count, as produced by `clap`'s `action =
    /// ArgAction::Count`.
    pub fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Self::Info,
            1 => Self::Debug,
            _ => Self::Trace,
        }
    }

    fn as_filter_directive(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Debug => "txauth=debug,info",
            Self::Trace => "trace",
        }
    }
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG`, if set, always wins over `verbosity`, so the environment can override CLI-derived
/// defaults for ad hoc debugging.
pub fn init_tracing(verbosity: Verbosity) -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.as_filter_directive()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
