use std::time::Duration;

/// Runtime configuration for the authorizer.
///
/// All of them are exposed as CLI flags (with `env` fallback) by the `txauth` binary.
#[derive(Debug, Clone)]
pub struct AuthorizerConfig {
    /// Outer TTL on [`crate::window::TransactionWindow`] entries: an entry that hasn't been
    /// written to in this long is reclaimed wholesale, regardless of what it still contains.
    pub cache_expiration_interval: Duration,
    /// Per-pair age threshold used by the eviction loop, and the horizon used by the
    /// doubled-transaction rule (R5).
    pub eviction_interval: Duration,
    /// Horizon used by the high-frequency rule (R4).
    pub high_frequency_interval: Duration,
    /// Threshold used by the high-frequency rule (R4).
    pub high_frequency_threshold: usize,
    /// Period of the background eviction loop.
    pub eviction_tick: Duration,
    /// Bound on the number of distinct `(merchant, amount)` keys held by the window at once.
    pub max_window_keys: u64,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            cache_expiration_interval: Duration::from_secs(30),
            eviction_interval: Duration::from_secs(120),
            high_frequency_interval: Duration::from_secs(120),
            high_frequency_threshold: 3,
            eviction_tick: Duration::from_secs(3),
            max_window_keys: 100,
        }
    }
}
