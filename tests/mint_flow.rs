//! End-to-end flow scenarios against scripted gateways.

mod common;

use common::*;

use serde_json::{json, Value};

use mintflow::config::ClientConfig;
use mintflow::coordinator::{MintCoordinator, Notice};
use mintflow::session::NetworkStatus;

/// Script a user-approved connect on the given chain and run it.
async fn connect_on_chain(
    coordinator: &MintCoordinator,
    wallet: &MockGateway,
    chain: &str,
) -> Vec<Notice> {
    wallet.respond("eth_requestAccounts", json!([TEST_ACCOUNT]));
    wallet.respond("eth_chainId", json!(chain));
    coordinator.connect().await
}

#[tokio::test]
async fn no_provider_still_reads_count() {
    let wallet = MockGateway::unavailable();
    let node = MockGateway::new();
    node.respond("eth_call", encoded_count(3));

    let (coordinator, _notices) = build_coordinator(wallet.clone(), node.clone());
    coordinator.initialize().await;

    // The read-only binding works without any wallet.
    let state = coordinator.state();
    assert_eq!(state.current_account, "");
    assert_eq!(state.minted_count, "3");

    // Connecting is what fails, and it fails fast.
    let notices = coordinator.connect().await;
    assert_eq!(notices, vec![Notice::ProviderMissing]);
    assert_eq!(coordinator.state().current_account, "");
}

#[tokio::test]
async fn existing_authorization_populates_without_prompt() {
    let wallet = MockGateway::new();
    wallet.respond("eth_accounts", json!([TEST_ACCOUNT]));
    wallet.respond("eth_chainId", json!("0x4"));
    let node = MockGateway::new();
    node.respond("eth_call", encoded_count(3));

    let (coordinator, _notices) = build_coordinator(wallet.clone(), node.clone());
    coordinator.initialize().await;

    let state = coordinator.state();
    assert_eq!(state.current_account, hex_addr(&test_account()));
    assert_eq!(state.network, Some(NetworkStatus::Matches));
    assert_eq!(wallet.prompt_count(), 0);
}

#[tokio::test]
async fn wrong_network_is_surfaced_but_does_not_block_minting() {
    let wallet = MockGateway::new();
    wallet.respond("eth_accounts", json!([]));
    let node = MockGateway::new();
    node.respond("eth_call", encoded_count(3));

    let (coordinator, _notices) = build_coordinator(wallet.clone(), node.clone());
    coordinator.initialize().await;

    let notices = connect_on_chain(&coordinator, &wallet, "0x1").await;
    assert_eq!(
        notices,
        vec![
            Notice::Connected {
                account: hex_addr(&test_account())
            },
            Notice::NetworkMismatch {
                actual: "0x1".to_string(),
                required: "0x4".to_string()
            },
        ]
    );

    // The session is authenticated and the mint action still goes through.
    let tx = test_tx_hash();
    wallet.respond("eth_sendTransaction", json!(tx.to_string()));
    node.respond("eth_getTransactionReceipt", receipt(tx, true, vec![]));
    node.respond("eth_call", encoded_count(4));

    let notices = coordinator.mint().await;
    assert_eq!(notices.len(), 2);
    assert!(matches!(notices[0], Notice::MintSubmitted { .. }));
    assert!(matches!(
        &notices[1],
        Notice::MintConfirmed {
            token_id: None,
            viewer_url: None,
            ..
        }
    ));
    assert_eq!(coordinator.state().minted_count, "4");
}

#[tokio::test]
async fn reverted_mint_surfaces_hash_and_leaves_count_alone() {
    let wallet = MockGateway::new();
    wallet.respond("eth_accounts", json!([]));
    let node = MockGateway::new();
    node.respond("eth_call", encoded_count(3));

    let (coordinator, _notices) = build_coordinator(wallet.clone(), node.clone());
    coordinator.initialize().await;
    connect_on_chain(&coordinator, &wallet, "0x4").await;

    let tx = test_tx_hash();
    wallet.respond("eth_sendTransaction", json!(tx.to_string()));
    node.respond("eth_getTransactionReceipt", receipt(tx, false, vec![]));

    let notices = coordinator.mint().await;
    assert!(matches!(notices[0], Notice::MintSubmitted { .. }));
    match &notices[1] {
        Notice::MintFailed { reason, tx_hash } => {
            assert!(reason.contains("reverted"));
            assert_eq!(tx_hash.as_deref(), Some(tx.to_string().as_str()));
        }
        other => panic!("unexpected notice: {other:?}"),
    }

    // No refresh after a failed mint: the single read was at startup.
    assert_eq!(coordinator.state().minted_count, "3");
    let call_reads = node
        .calls()
        .iter()
        .filter(|method| *method == "eth_call")
        .count();
    assert_eq!(call_reads, 1);
}

#[tokio::test]
async fn confirmed_mint_surfaces_token_and_refreshes_count() {
    let wallet = MockGateway::new();
    wallet.respond("eth_accounts", json!([]));
    let node = MockGateway::new();
    node.respond("eth_call", encoded_count(7));

    let (coordinator, _notices) = build_coordinator(wallet.clone(), node.clone());
    coordinator.initialize().await;
    connect_on_chain(&coordinator, &wallet, "0x4").await;

    let tx = test_tx_hash();
    let contract = contract_address();
    wallet.respond("eth_sendTransaction", json!(tx.to_string()));
    node.respond(
        "eth_getTransactionReceipt",
        receipt(tx, true, vec![mint_log(contract, test_account(), 7)]),
    );
    node.respond("eth_call", encoded_count(8));

    let notices = coordinator.mint().await;
    assert_eq!(
        notices[0],
        Notice::MintSubmitted {
            tx_hash: tx.to_string()
        }
    );
    let expected_viewer = format!(
        "https://testnets.opensea.io/assets/{}/7",
        hex_addr(&contract)
    );
    assert_eq!(
        notices[1],
        Notice::MintConfirmed {
            tx_hash: tx.to_string(),
            token_id: Some("7".to_string()),
            viewer_url: Some(expected_viewer),
        }
    );
    assert_eq!(coordinator.state().minted_count, "8");

    // Strict ordering: startup read, then the receipt poll, then the
    // refresh read only after confirmation resolved.
    let sequence: Vec<String> = node
        .calls()
        .into_iter()
        .filter(|method| method == "eth_call" || method == "eth_getTransactionReceipt")
        .collect();
    assert_eq!(
        sequence,
        vec!["eth_call", "eth_getTransactionReceipt", "eth_call"]
    );
}

#[tokio::test]
async fn rejected_signing_returns_flow_to_prior_state() {
    let wallet = MockGateway::new();
    wallet.respond("eth_accounts", json!([]));
    let node = MockGateway::new();
    node.respond("eth_call", encoded_count(3));

    let (coordinator, _notices) = build_coordinator(wallet.clone(), node.clone());
    coordinator.initialize().await;
    connect_on_chain(&coordinator, &wallet, "0x4").await;

    use mintflow::provider::ProviderError;
    wallet.fail("eth_sendTransaction", ProviderError::Rejected);

    let notices = coordinator.mint().await;
    assert_eq!(notices, vec![Notice::MintRejected]);

    // Account and count both survive the rejection; the user may retry.
    assert_eq!(coordinator.state().current_account, hex_addr(&test_account()));
    assert_eq!(coordinator.state().minted_count, "3");
}

#[tokio::test]
async fn authorization_does_not_mutate_count() {
    let wallet = MockGateway::new();
    wallet.respond("eth_accounts", json!([]));
    let node = MockGateway::new();
    node.respond("eth_call", encoded_count(5));

    let (coordinator, _notices) = build_coordinator(wallet.clone(), node.clone());
    coordinator.initialize().await;
    connect_on_chain(&coordinator, &wallet, "0x4").await;

    assert_eq!(coordinator.state().minted_count, "5");
    let call_reads = node
        .calls()
        .iter()
        .filter(|method| *method == "eth_call")
        .count();
    assert_eq!(call_reads, 1);
}

#[tokio::test]
async fn unconfirmed_mint_times_out() {
    let wallet = MockGateway::new();
    wallet.respond("eth_accounts", json!([]));
    let node = MockGateway::new();
    node.respond("eth_call", encoded_count(3));
    node.respond_default("eth_getTransactionReceipt", Value::Null);

    let mut config = ClientConfig::default();
    config.rpc.confirmation_timeout_secs = 0;

    let (coordinator, _notices) = build_coordinator_with(&config, wallet.clone(), node.clone());
    coordinator.initialize().await;
    connect_on_chain(&coordinator, &wallet, "0x4").await;

    let tx = test_tx_hash();
    wallet.respond("eth_sendTransaction", json!(tx.to_string()));

    let notices = coordinator.mint().await;
    assert!(matches!(notices[0], Notice::MintSubmitted { .. }));
    match &notices[1] {
        Notice::MintFailed { reason, .. } => assert!(reason.contains("not confirmed")),
        other => panic!("unexpected notice: {other:?}"),
    }
    assert_eq!(coordinator.state().minted_count, "3");
}
