//! Observable flow state and user-facing notices.

use crate::session::NetworkStatus;

/// Snapshot of everything the presentation layer can observe.
#[derive(Debug, Clone)]
pub struct FlowState {
    /// Authorized account as a lowercase hex string, empty until connected.
    pub current_account: String,
    /// String-encoded minted counter; stale until the next explicit read.
    pub minted_count: String,
    /// Fixed size of the collection.
    pub total_supply: u64,
    /// Network status of the session, once known.
    pub network: Option<NetworkStatus>,
}

impl FlowState {
    pub fn new(total_supply: u64) -> Self {
        Self {
            current_account: String::new(),
            minted_count: "0".to_string(),
            total_supply,
            network: None,
        }
    }

    /// Whether an account is currently authorized.
    pub fn is_connected(&self) -> bool {
        !self.current_account.is_empty()
    }
}

/// A user-facing message surfaced by the coordinator.
///
/// Failures are reported through these rather than re-thrown; the
/// presentation layer renders them and the user decides whether to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// No wallet provider detected; nothing wallet-dependent can proceed.
    ProviderMissing,
    /// Wallet connected.
    Connected { account: String },
    /// Wallet is on a different chain. Advisory; the flow continues.
    NetworkMismatch { actual: String, required: String },
    /// The user declined the connection prompt.
    AuthorizationRejected,
    /// Mint attempted without an authenticated session.
    NotAuthenticated,
    /// The wallet accepted the mint transaction.
    MintSubmitted { tx_hash: String },
    /// The user declined to sign the mint transaction.
    MintRejected,
    /// Mint confirmed on-chain.
    MintConfirmed {
        tx_hash: String,
        token_id: Option<String>,
        viewer_url: Option<String>,
    },
    /// A mint was observed through the event subscription.
    MintObserved {
        minter: String,
        token_id: String,
        viewer_url: String,
    },
    /// The mint flow failed mid-action.
    MintFailed {
        reason: String,
        tx_hash: Option<String>,
    },
    /// A non-mint action failed.
    ActionFailed {
        action: &'static str,
        reason: String,
    },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::ProviderMissing => {
                write!(f, "No wallet provider detected. Install a wallet to continue.")
            }
            Notice::Connected { account } => write!(f, "Connected as {account}."),
            Notice::NetworkMismatch { actual, required } => write!(
                f,
                "Wallet is on chain {actual}, but chain {required} is required. Continuing anyway."
            ),
            Notice::AuthorizationRejected => {
                write!(f, "Wallet connection request was declined.")
            }
            Notice::NotAuthenticated => write!(f, "Connect a wallet before minting."),
            Notice::MintSubmitted { tx_hash } => {
                write!(f, "Mint transaction {tx_hash} submitted, awaiting confirmation.")
            }
            Notice::MintRejected => write!(f, "Mint transaction was declined in the wallet."),
            Notice::MintConfirmed {
                tx_hash,
                token_id,
                viewer_url,
            } => match (token_id, viewer_url) {
                (Some(token_id), Some(viewer_url)) => write!(
                    f,
                    "Mint confirmed in {tx_hash}. Token {token_id} is viewable at {viewer_url}."
                ),
                _ => write!(f, "Mint confirmed in {tx_hash}."),
            },
            Notice::MintObserved {
                minter,
                token_id,
                viewer_url,
            } => write!(
                f,
                "Token {token_id} minted to {minter}. View it at {viewer_url}."
            ),
            Notice::MintFailed { reason, tx_hash } => match tx_hash {
                Some(tx_hash) => {
                    write!(f, "Mint failed ({reason}). Inspect transaction {tx_hash}.")
                }
                None => write!(f, "Mint failed: {reason}."),
            },
            Notice::ActionFailed { action, reason } => write!(f, "{action} failed: {reason}"),
        }
    }
}

/// Per-token viewer link: `<base>/<contract_address>/<token_id>`.
pub(crate) fn viewer_link(base: &str, contract: &str, token_id: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), contract, token_id)
}
