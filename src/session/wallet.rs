//! Wallet session operations.
//!
//! # Responsibilities
//! - Query already-granted accounts without prompting
//! - Request account authorization (prompts the user)
//! - Record the wallet's chain id and compare it to the required chain
//!
//! Account queries go through the injected [`ProviderGateway`]; the session
//! never talks to a transport directly and never stores key material.

use std::sync::Arc;

use alloy::primitives::Address;
use arc_swap::ArcSwap;
use serde_json::{json, Value};

use crate::provider::{ProviderError, ProviderGateway};
use crate::session::types::{Authorization, NetworkStatus, SessionError, SessionState};

/// A wallet session bound to one provider gateway.
pub struct WalletSession {
    gateway: Arc<dyn ProviderGateway>,
    required_chain_id: String,
    state: ArcSwap<SessionState>,
}

impl WalletSession {
    /// Create a session in the `Unchecked` state.
    pub fn new(gateway: Arc<dyn ProviderGateway>, required_chain_id: impl Into<String>) -> Self {
        Self {
            gateway,
            required_chain_id: required_chain_id.into(),
            state: ArcSwap::from_pointee(SessionState::Unchecked),
        }
    }

    /// Current session state snapshot.
    pub fn state(&self) -> SessionState {
        self.state.load().as_ref().clone()
    }

    /// The authorized account, if any.
    pub fn account(&self) -> Option<Address> {
        self.state.load().account()
    }

    /// Network status of the authenticated session, if known.
    pub fn network(&self) -> Option<NetworkStatus> {
        match self.state.load().as_ref() {
            SessionState::Authenticated { network, .. } => Some(network.clone()),
            _ => None,
        }
    }

    /// The chain id this session expects the wallet to be on.
    pub fn required_chain_id(&self) -> &str {
        &self.required_chain_id
    }

    /// Query accounts the wallet has already granted, without prompting.
    ///
    /// Moves an `Unchecked` session to `Authenticated` or `Unauthenticated`.
    /// Once past `Unchecked`, a session only authenticates through
    /// [`request_authorization`](Self::request_authorization); a later silent
    /// query reports what it saw but does not change an `Unauthenticated`
    /// session's state.
    pub async fn check_existing_authorization(&self) -> Result<Option<Address>, SessionError> {
        if !self.gateway.is_available() {
            return Err(ProviderError::Unavailable.into());
        }

        let accounts = self.gateway.request("eth_accounts", json!([])).await?;
        let found = parse_accounts(&accounts)?.into_iter().next();

        match found {
            Some(account) => {
                // Chain queries never prompt, so the network status can be
                // recorded on the silent path too.
                let network = self.query_network().await?;
                let stays_unauthenticated =
                    matches!(self.state.load().as_ref(), SessionState::Unauthenticated);
                if !stays_unauthenticated {
                    self.state.store(Arc::new(SessionState::Authenticated {
                        account,
                        network,
                    }));
                    tracing::info!(account = %account, "found previously authorized account");
                }
                Ok(Some(account))
            }
            None => {
                if matches!(self.state.load().as_ref(), SessionState::Unchecked) {
                    self.state.store(Arc::new(SessionState::Unauthenticated));
                }
                tracing::debug!("no previously authorized account");
                Ok(None)
            }
        }
    }

    /// Ask the wallet to authorize an account. Prompts the user.
    pub async fn request_authorization(&self) -> Result<Authorization, SessionError> {
        if !self.gateway.is_available() {
            return Err(ProviderError::Unavailable.into());
        }

        let accounts = self.gateway.request("eth_requestAccounts", json!([])).await?;
        let account = parse_accounts(&accounts)?
            .into_iter()
            .next()
            .ok_or(SessionError::NoAccounts)?;

        let network = self.query_network().await?;
        if let NetworkStatus::Mismatch { actual } = &network {
            tracing::warn!(
                actual = %actual,
                required = %self.required_chain_id,
                "wallet is on a different chain"
            );
        }

        self.state.store(Arc::new(SessionState::Authenticated {
            account,
            network: network.clone(),
        }));
        tracing::info!(account = %account, "wallet authorized");

        Ok(Authorization { account, network })
    }

    async fn query_network(&self) -> Result<NetworkStatus, SessionError> {
        let value = self.gateway.request("eth_chainId", json!([])).await?;
        let chain = value
            .as_str()
            .ok_or_else(|| SessionError::Response("chain id is not a string".to_string()))?;

        if chain.eq_ignore_ascii_case(&self.required_chain_id) {
            Ok(NetworkStatus::Matches)
        } else {
            Ok(NetworkStatus::Mismatch {
                actual: chain.to_ascii_lowercase(),
            })
        }
    }
}

fn parse_accounts(value: &Value) -> Result<Vec<Address>, SessionError> {
    let entries = value
        .as_array()
        .ok_or_else(|| SessionError::Response("account list is not an array".to_string()))?;

    entries
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .ok_or_else(|| SessionError::Response("account is not a string".to_string()))?
                .parse::<Address>()
                .map_err(|e| SessionError::Response(format!("bad account address: {e}")))
        })
        .collect()
}
