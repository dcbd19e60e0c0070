use serde::{Deserialize, Serialize};

/// The sole cardholder record maintained for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "active-card")]
    pub active_card: bool,
    #[serde(rename = "available-limit")]
    pub available_limit: i64,
}

/// An immutable, fully-timestamped transaction.
///
/// `processing_time` is assigned exactly once, at ingest, by [`crate::dispatcher::classify`] --
/// never again afterwards, and never by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub merchant: String,
    pub amount: i64,
    pub transaction_time: i64,
    pub processing_time: i64,
}

impl Transaction {
    /// Builds a transaction from its wire fields plus the processing time assigned at ingest.
    pub fn from_raw(raw: RawTransaction, processing_time: i64) -> Self {
        Self {
            merchant: raw.merchant,
            amount: raw.amount,
            transaction_time: raw.time,
            processing_time,
        }
    }
}

/// A stable violation tag, serialized as the exact string the protocol expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Violation {
    #[serde(rename = "account-already-initialized")]
    AccountAlreadyInitialized,
    #[serde(rename = "account-not-initialized")]
    AccountNotInitialized,
    #[serde(rename = "card-not-active")]
    CardNotActive,
    #[serde(rename = "insufficient-limit")]
    InsufficientLimit,
    #[serde(rename = "high-frequency-small-interval")]
    HighFrequencySmallInterval,
    #[serde(rename = "doubled-transaction")]
    DoubledTransaction,
}

/// The result of processing one event: the account as it stands afterwards, plus whatever
/// violations were observed along the way.
#[derive(Debug, Clone, Serialize)]
pub struct AccountState {
    pub account: Account,
    pub violations: Vec<Violation>,
}

impl AccountState {
    pub fn clean(account: Account) -> Self {
        Self { account, violations: Vec::new() }
    }

    pub fn with_violations(account: Account, violations: Vec<Violation>) -> Self {
        Self { account, violations }
    }
}

/// Wire shape of `{"account": {...}}`.
#[derive(Debug, Deserialize)]
pub struct AccountEventPayload {
    pub account: Account,
}

/// Wire shape of `{"transaction": {...}}`.
#[derive(Debug, Deserialize)]
pub struct TransactionEventPayload {
    pub transaction: RawTransaction,
}

/// The raw, as-deserialized transaction, before `processing_time` has been assigned.
#[derive(Debug, Deserialize)]
pub struct RawTransaction {
    pub merchant: String,
    pub amount: i64,
    pub time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_wire_format_uses_kebab_case() {
        let account = Account { active_card: true, available_limit: 100 };
        let json = serde_json::to_string(&account).unwrap();
        assert_eq!(json, r#"{"active-card":true,"available-limit":100}"#);
    }

    #[test]
    fn violation_serializes_to_its_stable_tag() {
        let tag = serde_json::to_string(&Violation::HighFrequencySmallInterval).unwrap();
        assert_eq!(tag, r#""high-frequency-small-interval""#);
    }

    #[test]
    fn account_state_round_trips_through_json() {
        let state = AccountState::with_violations(
            Account { active_card: false, available_limit: 0 },
            vec![Violation::CardNotActive, Violation::InsufficientLimit],
        );
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(
            json,
            r#"{"account":{"active-card":false,"available-limit":0},"violations":["card-not-active","insufficient-limit"]}"#
        );
    }
}
