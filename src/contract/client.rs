//! Typed access to the collection contract.
//!
//! # Responsibilities
//! - Bind the fixed contract address to a read-only or signing executor
//! - Encode and submit the paid mint call
//! - Poll for confirmation and decode receipts
//! - Read the minted counter

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, LogData, TxHash, B256, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolEvent};
use serde_json::{json, Value};
use tokio::time::{interval, timeout};

use crate::config::RpcConfig;
use crate::contract::events::{self, EventSubscription, MintEventHandler};
use crate::contract::types::{
    address_hex, parse_hex_bytes, parse_quantity, ContractError, MintEvent, MintReceipt,
    MintRequest, PendingMint,
};
use crate::provider::{ProviderError, ProviderGateway};

sol! {
    /// Mint one token; payment is attached as transaction value.
    function mintToken() external payable;

    /// How many tokens the collection has issued so far.
    function totalMinted() external view returns (uint256);

    /// Emitted once per successful mint.
    #[derive(Debug)]
    event TokenMinted(address indexed minter, uint256 tokenId);
}

/// Binding backed by the read-only node gateway. No wallet needed.
#[derive(Clone)]
pub struct ReadBinding {
    pub(crate) address: Address,
    pub(crate) gateway: Arc<dyn ProviderGateway>,
}

/// Binding backed by the wallet gateway and an authorized account.
///
/// Only constructed through [`ContractClient::bind_for_write`] with an
/// account taken from an authenticated session, so a state-mutating call
/// always has a signer behind it.
#[derive(Clone)]
pub struct WriteBinding {
    pub(crate) address: Address,
    pub(crate) gateway: Arc<dyn ProviderGateway>,
    pub(crate) from: Address,
}

/// Client for one deployed collection contract.
pub struct ContractClient {
    address: Address,
    read_gateway: Arc<dyn ProviderGateway>,
    wallet_gateway: Arc<dyn ProviderGateway>,
    confirmation_timeout: Duration,
    receipt_poll_interval: Duration,
    event_poll_interval: Duration,
}

impl ContractClient {
    pub fn new(
        address: Address,
        read_gateway: Arc<dyn ProviderGateway>,
        wallet_gateway: Arc<dyn ProviderGateway>,
        rpc: &RpcConfig,
    ) -> Self {
        Self {
            address,
            read_gateway,
            wallet_gateway,
            confirmation_timeout: Duration::from_secs(rpc.confirmation_timeout_secs),
            receipt_poll_interval: Duration::from_millis(rpc.receipt_poll_interval_ms),
            event_poll_interval: Duration::from_millis(rpc.event_poll_interval_ms),
        }
    }

    /// The contract address this client is bound to.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Binding for queries; works without any wallet.
    pub fn bind_for_read(&self) -> ReadBinding {
        ReadBinding {
            address: self.address,
            gateway: self.read_gateway.clone(),
        }
    }

    /// Binding for state-mutating calls signed by `from`.
    pub fn bind_for_write(&self, from: Address) -> WriteBinding {
        WriteBinding {
            address: self.address,
            gateway: self.wallet_gateway.clone(),
            from,
        }
    }

    /// Submit a paid mint transaction.
    ///
    /// Returns as soon as the wallet hands back a transaction hash; the
    /// caller decides when to wait for confirmation.
    pub async fn mint(
        &self,
        binding: &WriteBinding,
        request: &MintRequest,
    ) -> Result<PendingMint, ContractError> {
        if !binding.gateway.is_available() {
            return Err(ProviderError::Unavailable.into());
        }

        let calldata = Bytes::from(mintTokenCall {}.abi_encode());
        let params = json!([{
            "from": address_hex(&binding.from),
            "to": address_hex(&binding.address),
            "value": format!("0x{:x}", request.value),
            "data": calldata.to_string(),
        }]);

        let result = binding.gateway.request("eth_sendTransaction", params).await?;
        let tx_hash: TxHash = result
            .as_str()
            .ok_or_else(|| ContractError::Response("transaction hash is not a string".to_string()))?
            .parse()
            .map_err(|e| ContractError::Response(format!("bad transaction hash: {e}")))?;

        tracing::info!(tx_hash = %tx_hash, value = %request.value, "mint transaction submitted");
        Ok(PendingMint { tx_hash })
    }

    /// Wait until a submitted mint is mined.
    ///
    /// Polls the read-only gateway for the receipt; a reverted transaction
    /// is an error carrying the hash so the user can inspect it.
    pub async fn await_confirmation(
        &self,
        pending: &PendingMint,
    ) -> Result<MintReceipt, ContractError> {
        let window = self.confirmation_timeout;

        let result = timeout(window, async {
            let mut ticker = interval(self.receipt_poll_interval);

            loop {
                ticker.tick().await;

                let value = self
                    .read_gateway
                    .request(
                        "eth_getTransactionReceipt",
                        json!([pending.tx_hash.to_string()]),
                    )
                    .await?;

                if value.is_null() {
                    tracing::debug!(tx_hash = %pending.tx_hash, "transaction pending");
                    continue;
                }

                let receipt = parse_receipt(&value, self.address)?;
                if !receipt.status {
                    return Err(ContractError::Reverted {
                        hash: receipt.tx_hash,
                    });
                }

                tracing::info!(
                    tx_hash = %receipt.tx_hash,
                    block_number = receipt.block_number,
                    "mint transaction confirmed"
                );
                return Ok(receipt);
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(ContractError::ConfirmationTimeout(window.as_secs())),
        }
    }

    /// Read the contract-held minted counter. Pure read, no side effects.
    pub async fn read_minted_count(&self, binding: &ReadBinding) -> Result<U256, ContractError> {
        let calldata = Bytes::from(totalMintedCall {}.abi_encode());
        let params = json!([
            {
                "to": address_hex(&binding.address),
                "data": calldata.to_string(),
            },
            "latest",
        ]);

        let result = binding.gateway.request("eth_call", params).await?;
        let raw = parse_hex_bytes(&result)?;
        let count = totalMintedCall::abi_decode_returns(&raw)
            .map_err(|e| ContractError::Response(format!("bad counter response: {e}")))?;

        tracing::debug!(count = %count, "minted count read");
        Ok(count)
    }

    /// Start delivering decoded mint events to `handler`.
    ///
    /// The returned subscription stops the underlying poll task when
    /// cancelled or dropped, so re-subscribing never stacks handlers.
    pub fn subscribe_to_mint_events(
        &self,
        binding: ReadBinding,
        handler: MintEventHandler,
    ) -> EventSubscription {
        events::spawn(binding, handler, self.event_poll_interval)
    }
}

impl std::fmt::Debug for ContractClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractClient")
            .field("address", &self.address)
            .field("confirmation_timeout", &self.confirmation_timeout)
            .finish()
    }
}

/// Decode a mined receipt, collecting this contract's mint events.
pub(crate) fn parse_receipt(value: &Value, contract: Address) -> Result<MintReceipt, ContractError> {
    let tx_hash: TxHash = value
        .get("transactionHash")
        .and_then(Value::as_str)
        .ok_or_else(|| ContractError::Response("receipt missing transactionHash".to_string()))?
        .parse()
        .map_err(|e| ContractError::Response(format!("bad transaction hash: {e}")))?;

    let status = parse_quantity(value.get("status").unwrap_or(&Value::Null))? == 1;
    let block_number = parse_quantity(value.get("blockNumber").unwrap_or(&Value::Null))?;

    let mut events = Vec::new();
    if let Some(logs) = value.get("logs").and_then(Value::as_array) {
        for log in logs {
            match decode_mint_log(log, contract) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(error) => tracing::warn!(%error, "skipping undecodable receipt log"),
            }
        }
    }

    Ok(MintReceipt {
        tx_hash,
        block_number,
        status,
        events,
    })
}

/// Decode a raw JSON-RPC log entry if it is this contract's mint event.
pub(crate) fn decode_mint_log(
    log: &Value,
    contract: Address,
) -> Result<Option<MintEvent>, ContractError> {
    let address: Address = log
        .get("address")
        .and_then(Value::as_str)
        .ok_or_else(|| ContractError::Response("log missing address".to_string()))?
        .parse()
        .map_err(|e| ContractError::Response(format!("bad log address: {e}")))?;

    if address != contract {
        return Ok(None);
    }

    let topics = log
        .get("topics")
        .and_then(Value::as_array)
        .ok_or_else(|| ContractError::Response("log missing topics".to_string()))?
        .iter()
        .map(|topic| {
            topic
                .as_str()
                .ok_or_else(|| ContractError::Response("topic is not a string".to_string()))?
                .parse::<B256>()
                .map_err(|e| ContractError::Response(format!("bad topic: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if topics.first() != Some(&TokenMinted::SIGNATURE_HASH) {
        return Ok(None);
    }

    let data = parse_hex_bytes(log.get("data").unwrap_or(&Value::Null))?;
    let decoded = TokenMinted::decode_log_data(&LogData::new_unchecked(topics, data))
        .map_err(|e| ContractError::Response(format!("bad mint event: {e}")))?;

    Ok(Some(MintEvent {
        minter: decoded.minter,
        token_id: decoded.tokenId,
    }))
}
