//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash, U256};
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;

use mintflow::config::ClientConfig;
use mintflow::contract::TokenMinted;
use mintflow::coordinator::{MintCoordinator, Notice};
use mintflow::provider::{ProviderError, ProviderGateway};

/// Scripted JSON-RPC gateway standing in for a wallet agent or a node.
///
/// Responses are per-method queues; once a queue runs dry the registered
/// default (if any) answers, otherwise the call fails. Every call is
/// recorded so tests can assert ordering and prompt counts.
pub struct MockGateway {
    available: bool,
    queues: Mutex<HashMap<String, VecDeque<Result<Value, ProviderError>>>>,
    defaults: Mutex<HashMap<String, Value>>,
    calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            available: true,
            queues: Mutex::new(HashMap::new()),
            defaults: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            available: false,
            queues: Mutex::new(HashMap::new()),
            defaults: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Queue one successful response for a method.
    pub fn respond(&self, method: &str, value: Value) {
        self.queues
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(Ok(value));
    }

    /// Queue one failure for a method.
    pub fn fail(&self, method: &str, error: ProviderError) {
        self.queues
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(Err(error));
    }

    /// Answer a method with a fixed value once its queue is empty.
    pub fn respond_default(&self, method: &str, value: Value) {
        self.defaults
            .lock()
            .unwrap()
            .insert(method.to_string(), value);
    }

    /// Methods called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times the wallet was asked to prompt the user.
    pub fn prompt_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|method| *method == "eth_requestAccounts")
            .count()
    }
}

#[async_trait]
impl ProviderGateway for MockGateway {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request(&self, method: &str, _params: Value) -> Result<Value, ProviderError> {
        self.calls.lock().unwrap().push(method.to_string());

        if !self.available {
            return Err(ProviderError::Unavailable);
        }

        if let Some(queued) = self
            .queues
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(|queue| queue.pop_front())
        {
            return queued;
        }

        if let Some(default) = self.defaults.lock().unwrap().get(method) {
            return Ok(default.clone());
        }

        Err(ProviderError::Rpc(format!("no scripted response for {method}")))
    }
}

/// The account all tests connect as (Anvil's first account).
pub const TEST_ACCOUNT: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

pub fn test_account() -> Address {
    TEST_ACCOUNT.parse().unwrap()
}

pub fn contract_address() -> Address {
    ClientConfig::default().contract.address.parse().unwrap()
}

pub fn hex_addr(address: &Address) -> String {
    address.to_string().to_lowercase()
}

pub fn test_tx_hash() -> TxHash {
    TxHash::repeat_byte(0xab)
}

/// ABI-encoded uint256 as an `eth_call` result.
pub fn encoded_count(count: u64) -> Value {
    json!(format!("0x{count:064x}"))
}

/// A raw JSON-RPC log entry for the collection's mint event.
pub fn mint_log(contract: Address, minter: Address, token_id: u64) -> Value {
    let event = TokenMinted {
        minter,
        tokenId: U256::from(token_id),
    };
    let data = event.encode_log_data();
    json!({
        "address": hex_addr(&contract),
        "topics": data.topics().iter().map(|t| t.to_string()).collect::<Vec<_>>(),
        "data": data.data.to_string(),
    })
}

/// A mined transaction receipt with the given status and logs.
pub fn receipt(tx_hash: TxHash, success: bool, logs: Vec<Value>) -> Value {
    json!({
        "transactionHash": tx_hash.to_string(),
        "status": if success { "0x1" } else { "0x0" },
        "blockNumber": "0x10",
        "logs": logs,
    })
}

/// Coordinator wired to the two mock gateways with a custom config.
pub fn build_coordinator_with(
    config: &ClientConfig,
    wallet: Arc<MockGateway>,
    node: Arc<MockGateway>,
) -> (MintCoordinator, UnboundedReceiver<Notice>) {
    // Keep the event poll loop quiet unless a test scripts block numbers.
    node.respond_default("eth_blockNumber", json!("0x0"));
    MintCoordinator::new(config, wallet, node).unwrap()
}

/// Coordinator wired to the two mock gateways with default config.
pub fn build_coordinator(
    wallet: Arc<MockGateway>,
    node: Arc<MockGateway>,
) -> (MintCoordinator, UnboundedReceiver<Notice>) {
    build_coordinator_with(&ClientConfig::default(), wallet, node)
}
