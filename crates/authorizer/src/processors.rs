//! The two rule-evaluating processors: one per event kind.

use crate::{
    account::{Account, AccountState, Transaction, Violation},
    config::AuthorizerConfig,
    store::AccountStore,
    window::TransactionWindow,
};

/// Validates an `AccountEvent` against the store and installs it if the store is empty.
#[derive(Debug, Default)]
pub struct AccountsProcessor;

impl AccountsProcessor {
    pub fn process(&self, store: &AccountStore, account: Account) -> AccountState {
        match store.get() {
            None => AccountState::clean(store.put(account)),
            Some(current) => {
                AccountState::with_violations(current, vec![Violation::AccountAlreadyInitialized])
            }
        }
    }
}

/// Validates a `TransactionEvent` against the store and window, applying R1-R5 in order, and
/// admits the transaction (decrementing the limit and inserting it into the window) only if no
/// violation was raised.
#[derive(Debug, Default)]
pub struct TransactionsProcessor;

impl TransactionsProcessor {
    pub fn process(
        &self,
        store: &AccountStore,
        window: &TransactionWindow,
        config: &AuthorizerConfig,
        tx: Transaction,
    ) -> AccountState {
        let Some(account) = store.get() else {
            // R1: short-circuits everything else.
            return AccountState::with_violations(
                Account { active_card: false, available_limit: 0 },
                vec![Violation::AccountNotInitialized],
            );
        };

        let mut violations = Vec::new();

        // R2
        if !account.active_card {
            violations.push(Violation::CardNotActive);
        }

        // R3
        if tx.amount > account.available_limit {
            violations.push(Violation::InsufficientLimit);
        }

        // R4: pairs within the HF horizon, plus this hypothetical one.
        let recent_total = window.count_within(config.high_frequency_interval) + 1;
        if recent_total >= config.high_frequency_threshold {
            violations.push(Violation::HighFrequencySmallInterval);
        }

        // R5: an existing pair for this (merchant, amount) within the dup horizon.
        let dup_horizon_ms = config.eviction_interval.as_millis() as i64;
        let is_doubled = window
            .get(&tx.merchant, tx.amount)
            .iter()
            .any(|&(_, pt)| (tx.processing_time - pt).abs() <= dup_horizon_ms);
        if is_doubled {
            violations.push(Violation::DoubledTransaction);
        }

        if !violations.is_empty() {
            return AccountState::with_violations(account, violations);
        }

        let updated = Account {
            active_card: account.active_card,
            available_limit: account.available_limit - tx.amount,
        };
        store.put(updated);
        window.put(&tx.merchant, tx.amount, tx.transaction_time, tx.processing_time);

        AccountState::clean(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ample_account() -> Account {
        Account { active_card: true, available_limit: 1_000_000 }
    }

    fn harness() -> (AccountStore, TransactionWindow, AuthorizerConfig) {
        (AccountStore::new(), TransactionWindow::new(100, Duration::from_secs(30)), AuthorizerConfig::default())
    }

    fn tx(merchant: &str, amount: i64, t: i64) -> Transaction {
        Transaction { merchant: merchant.to_string(), amount, transaction_time: t, processing_time: t }
    }

    #[test]
    fn account_initializes_once() {
        let store = AccountStore::new();
        let processor = AccountsProcessor;

        let first = processor.process(&store, ample_account());
        assert!(first.violations.is_empty());

        let second = processor.process(&store, Account { active_card: false, available_limit: 0 });
        assert_eq!(second.violations, vec![Violation::AccountAlreadyInitialized]);
        assert_eq!(second.account, ample_account());
    }

    #[test]
    fn transaction_without_account_is_rejected() {
        let (store, window, config) = harness();
        let processor = TransactionsProcessor;

        let result = processor.process(&store, &window, &config, tx("Nike", 100, 1));
        assert_eq!(result.violations, vec![Violation::AccountNotInitialized]);
    }

    #[test]
    fn insufficient_limit_does_not_mutate_account() {
        let (store, window, config) = harness();
        store.put(Account { active_card: true, available_limit: 10 });
        let processor = TransactionsProcessor;

        let result = processor.process(&store, &window, &config, tx("Burger King", 20, 1));
        assert_eq!(result.violations, vec![Violation::InsufficientLimit]);
        assert_eq!(store.get().unwrap().available_limit, 10);
    }

    #[test]
    fn card_not_active_is_reported() {
        let (store, window, config) = harness();
        store.put(Account { active_card: false, available_limit: 1000 });
        let processor = TransactionsProcessor;

        let result = processor.process(&store, &window, &config, tx("Nike", 10, 1));
        assert_eq!(result.violations, vec![Violation::CardNotActive]);
    }

    #[test]
    fn admitted_transaction_decrements_limit_and_fills_window() {
        let (store, window, config) = harness();
        store.put(ample_account());
        let processor = TransactionsProcessor;

        let result = processor.process(&store, &window, &config, tx("Nike", 500, 1));
        assert!(result.violations.is_empty());
        assert_eq!(result.account.available_limit, 1_000_000 - 500);
        assert_eq!(window.get("Nike", 500).len(), 1);
    }

    #[test]
    fn doubled_transaction_is_flagged_on_second_occurrence() {
        let (store, window, config) = harness();
        store.put(ample_account());
        let processor = TransactionsProcessor;

        let first = processor.process(&store, &window, &config, tx("Nike", 240, 1));
        assert!(first.violations.is_empty());

        let second = processor.process(&store, &window, &config, tx("Nike", 240, 2));
        assert_eq!(second.violations, vec![Violation::DoubledTransaction]);
        // Rejected transactions are never inserted into the window.
        assert_eq!(window.get("Nike", 240).len(), 1);
    }

    #[test]
    fn high_frequency_trips_on_the_threshold_th_transaction() {
        let (store, window, mut config) = harness();
        config.high_frequency_threshold = 3;
        store.put(ample_account());
        let processor = TransactionsProcessor;

        let r1 = processor.process(&store, &window, &config, tx("A", 1, 1));
        let r2 = processor.process(&store, &window, &config, tx("B", 1, 2));
        let r3 = processor.process(&store, &window, &config, tx("C", 1, 3));

        assert!(r1.violations.is_empty());
        assert!(r2.violations.is_empty());
        assert_eq!(r3.violations, vec![Violation::HighFrequencySmallInterval]);
    }

    #[test]
    fn rejected_transaction_does_not_count_toward_high_frequency() {
        let (store, window, mut config) = harness();
        config.high_frequency_threshold = 3;
        store.put(Account { active_card: true, available_limit: 5 });
        let processor = TransactionsProcessor;

        // Two rejected (insufficient limit) transactions plus one admitted one: since rejects are
        // never put into the window, the admitted transaction alone must not trip R4.
        processor.process(&store, &window, &config, tx("A", 100, 1));
        processor.process(&store, &window, &config, tx("B", 100, 2));
        let admitted = processor.process(&store, &window, &config, tx("C", 1, 3));

        assert!(admitted.violations.is_empty());
    }
}
