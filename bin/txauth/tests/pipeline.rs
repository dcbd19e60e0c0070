//! End-to-end coverage of the classify -> dispatch -> serialize pipeline, driven through
//! `run_lines` rather than a real process.

use txauth_authorizer::config::AuthorizerConfig;

#[tokio::test]
async fn account_initializes_then_rejects_a_second_event() {
    let lines = [
        r#"{"account":{"active-card":true,"available-limit":100}}"#,
        r#"{"account":{"active-card":true,"available-limit":100}}"#,
    ];

    let out = txauth::run_lines(&lines, AuthorizerConfig::default()).await;

    assert_eq!(
        out[0],
        r#"{"account":{"active-card":true,"available-limit":100},"violations":[]}"#
    );
    assert!(out[1].contains(r#""violations":["account-already-initialized"]"#));
}

#[tokio::test]
async fn insufficient_limit_leaves_the_account_untouched() {
    let lines = [
        r#"{"account":{"active-card":true,"available-limit":10}}"#,
        r#"{"transaction":{"merchant":"Burger King","amount":20,"time":1}}"#,
    ];

    let out = txauth::run_lines(&lines, AuthorizerConfig::default()).await;

    assert!(out[1].contains(r#""violations":["insufficient-limit"]"#));
    assert!(out[1].contains(r#""available-limit":10"#));
}

#[tokio::test]
async fn high_frequency_trips_on_the_threshold_th_transaction() {
    let mut config = AuthorizerConfig::default();
    config.high_frequency_threshold = 3;

    let lines = [
        r#"{"account":{"active-card":true,"available-limit":1000000}}"#,
        r#"{"transaction":{"merchant":"A","amount":1,"time":1}}"#,
        r#"{"transaction":{"merchant":"B","amount":1,"time":2}}"#,
        r#"{"transaction":{"merchant":"C","amount":1,"time":3}}"#,
    ];

    let out = txauth::run_lines(&lines, config).await;

    assert!(out[1].contains(r#""violations":[]"#));
    assert!(out[2].contains(r#""violations":[]"#));
    assert!(out[3].contains(r#""violations":["high-frequency-small-interval"]"#));
}

#[tokio::test]
async fn doubled_transaction_is_flagged_on_the_second_occurrence() {
    let lines = [
        r#"{"account":{"active-card":true,"available-limit":1000000}}"#,
        r#"{"transaction":{"merchant":"Nike","amount":240,"time":1}}"#,
        r#"{"transaction":{"merchant":"Nike","amount":240,"time":2}}"#,
    ];

    let out = txauth::run_lines(&lines, AuthorizerConfig::default()).await;

    assert!(out[1].contains(r#""violations":[]"#));
    assert!(out[2].contains(r#""violations":["doubled-transaction"]"#));
}

#[tokio::test]
async fn transaction_before_any_account_event_is_rejected() {
    let lines = [r#"{"transaction":{"merchant":"Nike","amount":10,"time":1}}"#];

    let out = txauth::run_lines(&lines, AuthorizerConfig::default()).await;

    assert!(out[0].contains(r#""violations":["account-not-initialized"]"#));
}

#[tokio::test]
async fn malformed_and_start_lines_produce_no_output() {
    let lines = [
        r#"{"start":true}"#,
        "not json at all",
        r#"{"unknown":"shape"}"#,
        r#"{"account":{"active-card":true,"available-limit":5}}"#,
    ];

    let out = txauth::run_lines(&lines, AuthorizerConfig::default()).await;

    assert_eq!(out.len(), 1);
    assert!(out[0].contains(r#""available-limit":5"#));
}
