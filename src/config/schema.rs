//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the minting client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Wallet provider settings (the signing side).
    pub wallet: WalletConfig,

    /// Read-only node settings and timing.
    pub rpc: RpcConfig,

    /// The collection contract being minted against.
    pub contract: ContractConfig,
}

/// Wallet provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// JSON-RPC endpoint of the wallet agent. Absent means no wallet is
    /// installed and every wallet-dependent operation fails fast.
    pub provider_url: Option<String>,

    /// Chain the collection lives on, as a hex chain id. A mismatch is
    /// surfaced as an advisory, not a hard failure.
    pub required_chain_id: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            provider_url: None,
            required_chain_id: "0x4".to_string(),
        }
    }
}

/// Read-only node endpoint and polling behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint used for reads, receipt polling, and log queries.
    pub url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// How long to wait for a submitted transaction to be mined.
    pub confirmation_timeout_secs: u64,

    /// Interval between receipt polls while awaiting confirmation.
    pub receipt_poll_interval_ms: u64,

    /// Interval between log polls on the mint-event subscription.
    pub event_poll_interval_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8545".to_string(),
            request_timeout_secs: 10,
            confirmation_timeout_secs: 120,
            receipt_poll_interval_ms: 2_000,
            event_poll_interval_ms: 2_000,
        }
    }
}

/// The fixed-supply collection contract.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// On-chain address of the collection contract.
    pub address: String,

    /// Payment attached to each mint, in wei.
    pub mint_price_wei: u128,

    /// Total number of tokens the collection can ever issue.
    pub total_supply: u64,

    /// Base URL for per-token viewer links
    /// (`<base>/<contract_address>/<token_id>`).
    pub viewer_base_url: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: "0x886D3C79c7C214f26c43d2Fd1c33d2dB85913bb9".to_string(),
            mint_price_wei: 1_500_000_000_000_000, // 0.0015 ether
            total_supply: 50,
            viewer_base_url: "https://testnets.opensea.io/assets".to_string(),
        }
    }
}
