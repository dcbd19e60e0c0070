//! Event classification and the dispatcher that enforces mutual exclusion around the store and
//! window.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{instrument, trace};

use crate::{
    account::{
        Account, AccountEventPayload, AccountState, Transaction, TransactionEventPayload,
    },
    config::AuthorizerConfig,
    error::ClassifyError,
    processors::{AccountsProcessor, TransactionsProcessor},
    store::AccountStore,
    window::{now_ms, TransactionWindow},
};

/// A decoded input line, ready for dispatch.
#[derive(Debug)]
pub enum ExternalEvent {
    /// Synthetic initialization sentinel; yields no output.
    Start,
    Account(Account),
    Transaction(Transaction),
}

/// Classifies one raw input line into an [`ExternalEvent`].
///
/// `processing_time` is assigned here, at ingest, for transaction events -- exactly once, per the
/// data model's invariant.
pub fn classify(line: &str, processing_time: i64) -> Result<ExternalEvent, ClassifyError> {
    let value: Value = serde_json::from_str(line)?;

    let Value::Object(map) = &value else {
        return Err(ClassifyError::Unrecognized);
    };

    if map.contains_key("account") {
        let payload: AccountEventPayload =
            serde_json::from_value(value).map_err(|e| ClassifyError::Decoding(e.to_string()))?;
        return Ok(ExternalEvent::Account(payload.account));
    }

    if map.contains_key("transaction") {
        let payload: TransactionEventPayload =
            serde_json::from_value(value).map_err(|e| ClassifyError::Decoding(e.to_string()))?;
        return Ok(ExternalEvent::Transaction(Transaction::from_raw(payload.transaction, processing_time)));
    }

    if map.contains_key("start") {
        return Ok(ExternalEvent::Start);
    }

    Err(ClassifyError::Unrecognized)
}

/// Consumes classified events, enforcing at-most-one-in-flight mutation of the store and window,
/// and produces the resulting [`AccountState`] snapshot for every non-`Start` event.
#[derive(Debug)]
pub struct EventDispatcher {
    store: Arc<AccountStore>,
    window: Arc<TransactionWindow>,
    config: AuthorizerConfig,
    /// Binary semaphore: exactly one dispatch is ever in flight at a time.
    permit: Semaphore,
    accounts: AccountsProcessor,
    transactions: TransactionsProcessor,
}

impl EventDispatcher {
    pub fn new(store: Arc<AccountStore>, window: Arc<TransactionWindow>, config: AuthorizerConfig) -> Self {
        Self {
            store,
            window,
            config,
            permit: Semaphore::new(1),
            accounts: AccountsProcessor,
            transactions: TransactionsProcessor,
        }
    }

    /// Dispatches one event. Returns `None` for `Start`, which is a no-op by definition.
    #[instrument(skip(self, event), target = "txauth::dispatcher")]
    pub async fn dispatch(&self, event: ExternalEvent) -> Option<AccountState> {
        let event = match event {
            ExternalEvent::Start => return None,
            other => other,
        };

        // Acquired uniformly before any store/window access for both event kinds, and released
        // (by drop) immediately after.
        let _permit = self.permit.acquire().await.expect("semaphore is never closed");

        let state = match event {
            ExternalEvent::Start => unreachable!("handled above"),
            ExternalEvent::Account(account) => self.accounts.process(&self.store, account),
            ExternalEvent::Transaction(tx) => {
                self.transactions.process(&self.store, &self.window, &self.config, tx)
            }
        };

        trace!(target: "txauth::dispatcher", violations = ?state.violations, "event processed");
        Some(state)
    }
}

/// Convenience for building a transaction's `processing_time` at the moment it's observed.
pub fn assign_processing_time() -> i64 {
    now_ms()
}
