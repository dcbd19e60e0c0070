#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]
#![doc(issue_tracker_base_url = "https://github.com/sorrela-labs/txauth/issues/")]

//! The streaming transaction authorizer's core engine.
//!
//! This crate provides:
//!
//!  - [`window::TransactionWindow`], a content-addressed, time-expiring multi-map over recent
//!    transactions, used to detect duplicates and high-frequency bursts;
//!  - [`store::AccountStore`], a single-account holder;
//!  - [`processors::AccountsProcessor`] and [`processors::TransactionsProcessor`], which turn
//!    decoded events into [`account::AccountState`] snapshots by applying the rule set;
//!  - [`dispatcher::EventDispatcher`], which classifies raw input lines, serializes access to the
//!    store and window behind a binary semaphore, and invokes the processors;
//!  - [`eviction::spawn_eviction_loop`], a background task that periodically prunes the window.
//!
//! ## Architecture
//!
//! The dispatcher and the eviction loop are independent consumers of the window: the dispatcher
//! reads it while evaluating rules and writes to it on admission, while the eviction loop only
//! ever removes stale pairs. Both run concurrently; the window's own internal locking (not the
//! dispatcher's semaphore) is what keeps that safe.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use txauth_authorizer::{
//!     account::Account,
//!     config::AuthorizerConfig,
//!     dispatcher::{classify, EventDispatcher},
//!     store::AccountStore,
//!     window::TransactionWindow,
//! };
//!
//! # async fn t() {
//! let config = AuthorizerConfig::default();
//! let dispatcher = EventDispatcher::new(
//!     Arc::new(AccountStore::new()),
//!     Arc::new(TransactionWindow::new(config.max_window_keys, config.cache_expiration_interval)),
//!     config,
//! );
//!
//! let event = classify(r#"{"account":{"active-card":true,"available-limit":100}}"#, 0).unwrap();
//! let snapshot = dispatcher.dispatch(event).await.unwrap();
//! assert!(snapshot.violations.is_empty());
//! # }
//! ```

pub mod account;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod eviction;
pub mod processors;
pub mod store;
pub mod window;

pub use crate::{
    account::{Account, AccountState, Transaction, Violation},
    config::AuthorizerConfig,
    dispatcher::{classify, EventDispatcher, ExternalEvent},
    error::{ClassifyError, EngineError},
    store::AccountStore,
    window::TransactionWindow,
};
