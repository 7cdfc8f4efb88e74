//! Mint-event subscription behavior.

mod common;

use common::*;

use std::time::Duration;

use serde_json::json;
use tokio::time::{sleep, timeout};

use mintflow::config::ClientConfig;
use mintflow::coordinator::Notice;

fn fast_poll_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.rpc.event_poll_interval_ms = 10;
    config
}

#[tokio::test]
async fn subscription_delivers_observed_mints() {
    let wallet = MockGateway::new();
    wallet.respond("eth_requestAccounts", json!([TEST_ACCOUNT]));
    wallet.respond("eth_chainId", json!("0x4"));
    let node = MockGateway::new();

    let config = fast_poll_config();
    let (coordinator, mut notices) = build_coordinator_with(&config, wallet, node.clone());

    // First poll records the cursor, the next one sees a new block with a log.
    node.respond("eth_blockNumber", json!("0x5"));
    node.respond("eth_blockNumber", json!("0x6"));
    node.respond(
        "eth_getLogs",
        json!([mint_log(contract_address(), test_account(), 7)]),
    );

    coordinator.connect().await;

    let notice = timeout(Duration::from_secs(2), notices.recv())
        .await
        .expect("no event within the window")
        .expect("notice stream closed");

    match notice {
        Notice::MintObserved {
            minter,
            token_id,
            viewer_url,
        } => {
            assert_eq!(minter, hex_addr(&test_account()));
            assert_eq!(token_id, "7");
            assert!(viewer_url.ends_with("/7"));
        }
        other => panic!("unexpected notice: {other:?}"),
    }

    // The cursor advanced past the log's block; nothing is re-delivered.
    sleep(Duration::from_millis(100)).await;
    assert!(notices.try_recv().is_err());
}

#[tokio::test]
async fn reconnect_replaces_the_subscription_instead_of_stacking() {
    let wallet = MockGateway::new();
    let node = MockGateway::new();

    let config = fast_poll_config();
    let (coordinator, mut notices) = build_coordinator_with(&config, wallet.clone(), node.clone());

    // Both watchers start from block 5.
    node.respond_default("eth_blockNumber", json!("0x5"));

    wallet.respond("eth_requestAccounts", json!([TEST_ACCOUNT]));
    wallet.respond("eth_chainId", json!("0x4"));
    coordinator.connect().await;
    sleep(Duration::from_millis(50)).await;

    // Second connect cancels the first watcher.
    wallet.respond("eth_requestAccounts", json!([TEST_ACCOUNT]));
    wallet.respond("eth_chainId", json!("0x4"));
    coordinator.connect().await;
    sleep(Duration::from_millis(50)).await;

    // A new block with a mint log appears. A stacked watcher would deliver
    // this twice.
    node.respond_default(
        "eth_getLogs",
        json!([mint_log(contract_address(), test_account(), 9)]),
    );
    node.respond_default("eth_blockNumber", json!("0x6"));

    let first = timeout(Duration::from_secs(2), notices.recv())
        .await
        .expect("no event within the window")
        .expect("notice stream closed");
    assert!(matches!(first, Notice::MintObserved { .. }));

    sleep(Duration::from_millis(100)).await;
    assert!(notices.try_recv().is_err());
}
