//! A content-addressed, time-expiring multi-map over recent transactions.
//!
//! The window is layered:
//!
//!  - an outer [`mini_moka::sync::Cache`] tracks which keys are still "fresh" (written to within
//!    `cache_expiration_interval`) and enforces a bound on the number of distinct keys. This layer
//!    never holds the actual pair data, only a presence marker, so it stays cheap regardless of
//!    how many pairs accumulate under a hot key.
//!  - an inner [`parking_lot::RwLock`]-guarded map holds the actual `(transactionTime,
//!    processingTime)` pairs per key. [`TransactionWindow::evict_expired`] trims pairs by age and
//!    reclaims whole entries once the outer cache has forgotten them.
//!
//! This split is what lets [`TransactionWindow::size`] stay an exact count of live pairs: the
//! inner map is the only source of truth for pairs, and entries are removed from it eagerly
//! rather than lazily discovered stale on next access.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use mini_moka::sync::Cache;
use parking_lot::{Mutex, RwLock};

/// Key into the window: a merchant/amount pair.
///
/// Kept as a tuple rather than a concatenated string on purpose -- a delimiter-joined
/// `format!("{merchant}{amount}")` key can collide across distinct `(merchant, amount)` pairs
/// (e.g. `("Nike1", 0)` vs `("Nike", 10)`); a tuple cannot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowKey {
    merchant: String,
    amount: i64,
}

impl WindowKey {
    pub fn new(merchant: impl Into<String>, amount: i64) -> Self {
        Self { merchant: merchant.into(), amount }
    }
}

/// One `(transactionTime, processingTime)` pair as recorded by [`TransactionWindow::put`].
pub type WindowPair = (i64, i64);

type EntryMap = HashMap<WindowKey, Arc<Mutex<Vec<WindowPair>>>>;

/// The transaction window itself.
#[derive(Debug)]
pub struct TransactionWindow {
    /// Tracks which keys are still fresh; bounds the distinct-key count. Holds no pair data.
    freshness: Cache<WindowKey, ()>,
    /// The actual pair storage, keyed the same way.
    entries: RwLock<EntryMap>,
}

impl TransactionWindow {
    /// Builds a window with the given outer-cache bounds.
    pub fn new(max_keys: u64, cache_expiration_interval: Duration) -> Self {
        let freshness = Cache::builder()
            .max_capacity(max_keys)
            .time_to_live(cache_expiration_interval)
            .build();
        Self { freshness, entries: RwLock::new(HashMap::new()) }
    }

    /// Appends `(transaction_time, processing_time)` to the entry for `(merchant, amount)`,
    /// creating it if necessary. Never fails.
    pub fn put(&self, merchant: &str, amount: i64, transaction_time: i64, processing_time: i64) {
        let key = WindowKey::new(merchant, amount);
        self.freshness.insert(key.clone(), ());

        // Fast path: the entry already exists, take only a read lock to find it.
        if let Some(pairs) = self.entries.read().get(&key) {
            pairs.lock().push((transaction_time, processing_time));
            return;
        }

        let mut entries = self.entries.write();
        entries
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .lock()
            .push((transaction_time, processing_time));
    }

    /// Returns a snapshot of the pairs recorded for `(merchant, amount)`, or an empty vec if the
    /// key is absent or has expired from the outer cache.
    pub fn get(&self, merchant: &str, amount: i64) -> Vec<WindowPair> {
        let key = WindowKey::new(merchant, amount);
        if self.freshness.get(&key).is_none() {
            return Vec::new();
        }
        self.entries.read().get(&key).map(|pairs| pairs.lock().clone()).unwrap_or_default()
    }

    /// Total pair count across all live entries.
    ///
    /// "Live" here means both present in the inner map and not yet reclaimed by the outer TTL
    /// cache; [`Self::evict_expired`] is what keeps those two in sync, so callers that want an
    /// up-to-date count should make sure eviction is running (it always is, in `txauth`'s main
    /// loop).
    pub fn size(&self) -> usize {
        self.entries.read().values().map(|pairs| pairs.lock().len()).sum()
    }

    /// Total pair count across all entries whose `processingTime` is within `interval` of now.
    ///
    /// Unlike [`Self::size`], this doesn't depend on the eviction loop having already swept stale
    /// pairs out -- it's a precise, on-demand count over the configured horizon, which is what R4
    /// (high-frequency-small-interval) needs regardless of how `evictionInterval` and
    /// `highFrequencyInterval` happen to relate to each other.
    pub fn count_within(&self, interval: Duration) -> usize {
        let now = now_ms();
        let interval_ms = interval.as_millis() as i64;
        self.entries
            .read()
            .values()
            .map(|pairs| pairs.lock().iter().filter(|&&(_, pt)| (now - pt) <= interval_ms).count())
            .sum()
    }

    /// Retains only the pairs whose `processingTime` is within `interval` of now, and reclaims
    /// whole entries that the outer cache has already forgotten.
    ///
    /// An entry whose pair list becomes empty is left in place -- it costs nothing to keep and
    /// the outer cache will reclaim it once its TTL lapses.
    pub fn evict_expired(&self, interval: Duration) {
        let now = now_ms();
        let interval_ms = interval.as_millis() as i64;

        let keys: Vec<WindowKey> = self.entries.read().keys().cloned().collect();
        for key in keys {
            if self.freshness.get(&key).is_none() {
                self.entries.write().remove(&key);
                continue;
            }
            if let Some(pairs) = self.entries.read().get(&key) {
                pairs.lock().retain(|&(_, pt)| (now - pt) <= interval_ms);
            }
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before unix epoch").as_millis() as i64
}
