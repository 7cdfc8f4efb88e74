//! Contract wire types, errors, and hex codecs.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use serde_json::Value;
use thiserror::Error;

use crate::provider::ProviderError;

/// Errors that can occur during contract operations.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Failure at the provider boundary (includes user rejection).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Transaction was mined but reverted.
    #[error("transaction {hash} reverted on-chain")]
    Reverted { hash: TxHash },

    /// Transaction was not mined within the confirmation window.
    #[error("transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// The node returned something the client could not decode.
    #[error("malformed RPC response: {0}")]
    Response(String),
}

/// One user-triggered mint: the payment attached to the call.
///
/// Ephemeral; built fresh per action and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintRequest {
    pub value: U256,
}

/// Handle for a submitted-but-unconfirmed mint transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMint {
    pub tx_hash: TxHash,
}

/// A decoded mint-completion event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintEvent {
    pub minter: Address,
    pub token_id: U256,
}

/// Receipt for a mined mint transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    /// False means the transaction reverted.
    pub status: bool,
    /// Mint events emitted by the collection contract in this transaction.
    pub events: Vec<MintEvent>,
}

/// Lowercase `0x`-prefixed address, the form wallets and explorers expect.
pub(crate) fn address_hex(address: &Address) -> String {
    address.to_string().to_lowercase()
}

/// Hex-encode a block number or other JSON-RPC quantity.
pub(crate) fn quantity_hex(value: u64) -> String {
    format!("0x{value:x}")
}

/// Parse a JSON-RPC hex quantity into a u64.
pub(crate) fn parse_quantity(value: &Value) -> Result<u64, ContractError> {
    let text = value
        .as_str()
        .ok_or_else(|| ContractError::Response("expected hex quantity".to_string()))?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    u64::from_str_radix(digits, 16)
        .map_err(|e| ContractError::Response(format!("bad hex quantity '{text}': {e}")))
}

/// Parse a `0x`-prefixed hex blob into bytes.
pub(crate) fn parse_hex_bytes(value: &Value) -> Result<Bytes, ContractError> {
    value
        .as_str()
        .ok_or_else(|| ContractError::Response("expected hex data".to_string()))?
        .parse::<Bytes>()
        .map_err(|e| ContractError::Response(format!("bad hex data: {e}")))
}
