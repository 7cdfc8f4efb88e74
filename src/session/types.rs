//! Session state and error definitions.

use alloy::primitives::Address;
use thiserror::Error;

use crate::provider::ProviderError;

/// Whether the wallet's chain matches the one the collection lives on.
///
/// A mismatch is advisory: the session stays authenticated and the flow
/// continues. A mint on the wrong chain surfaces as an RPC failure on its
/// own if it comes to that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkStatus {
    /// Connected to the required chain.
    Matches,
    /// Connected to some other chain.
    Mismatch {
        /// Hex chain id the wallet actually reported.
        actual: String,
    },
}

/// Lifecycle state of a wallet session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No query has been made yet.
    Unchecked,
    /// Queried, no authorized account found.
    Unauthenticated,
    /// An account is authorized for this session.
    Authenticated {
        account: Address,
        network: NetworkStatus,
    },
}

impl SessionState {
    /// The authorized account, if any.
    pub fn account(&self) -> Option<Address> {
        match self {
            SessionState::Authenticated { account, .. } => Some(*account),
            _ => None,
        }
    }
}

/// Result of a successful authorization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub account: Address,
    pub network: NetworkStatus,
}

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The wallet answered the prompt with an empty account list.
    #[error("wallet returned no authorized accounts")]
    NoAccounts,

    /// The wallet returned something that is not an account list or chain id.
    #[error("malformed wallet response: {0}")]
    Response(String),
}
