//! The connect / mint orchestration.
//!
//! # Responsibilities
//! - Run the silent startup checks concurrently
//! - Sequence connect: authorize → record network → subscribe to events
//! - Sequence mint: submit → await confirmation → refresh the counter
//! - Convert every failure into a notice at this boundary

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use arc_swap::ArcSwap;
use tokio::sync::{mpsc, Mutex};

use crate::config::{ClientConfig, ValidationError};
use crate::contract::types::address_hex;
use crate::contract::{
    ContractClient, ContractError, EventSubscription, MintEventHandler, MintRequest,
};
use crate::coordinator::state::{viewer_link, FlowState, Notice};
use crate::provider::{ProviderError, ProviderGateway};
use crate::session::{NetworkStatus, SessionError, WalletSession};

/// Owns the session, the contract client, and all observable state.
///
/// All writes to the exposed snapshot funnel through this object, so the
/// presentation layer can read it from any task without coordination.
pub struct MintCoordinator {
    session: WalletSession,
    contract: ContractClient,
    state: ArcSwap<FlowState>,
    notices: mpsc::UnboundedSender<Notice>,
    subscription: Mutex<Option<EventSubscription>>,
    mint_price: U256,
    viewer_base: String,
}

impl MintCoordinator {
    /// Build a coordinator from configuration and the two gateways.
    ///
    /// Returns the coordinator together with the receiving end of the
    /// notice stream that subscription-driven events are delivered on.
    pub fn new(
        config: &ClientConfig,
        wallet_gateway: Arc<dyn ProviderGateway>,
        node_gateway: Arc<dyn ProviderGateway>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Notice>), ValidationError> {
        let address: Address = config.contract.address.parse().map_err(|e| ValidationError {
            field: "contract.address",
            message: format!("'{}' is not a valid address: {e}", config.contract.address),
        })?;

        let session = WalletSession::new(
            wallet_gateway.clone(),
            config.wallet.required_chain_id.clone(),
        );
        let contract = ContractClient::new(address, node_gateway, wallet_gateway, &config.rpc);
        let (notices, notice_stream) = mpsc::unbounded_channel();

        let coordinator = Self {
            session,
            contract,
            state: ArcSwap::from_pointee(FlowState::new(config.contract.total_supply)),
            notices,
            subscription: Mutex::new(None),
            mint_price: U256::from(config.contract.mint_price_wei),
            viewer_base: config.contract.viewer_base_url.clone(),
        };

        Ok((coordinator, notice_stream))
    }

    /// Current observable snapshot.
    pub fn state(&self) -> Arc<FlowState> {
        self.state.load_full()
    }

    /// The wallet session this coordinator drives.
    pub fn session(&self) -> &WalletSession {
        &self.session
    }

    /// Startup checks: silent authorization and the first counter read.
    ///
    /// The two queries touch disjoint state and run concurrently; each
    /// publishes its result as it resolves and neither blocks the other.
    pub async fn initialize(&self) {
        let silent = async {
            match self.session.check_existing_authorization().await {
                Ok(Some(account)) => {
                    let network = self.session.network();
                    let account_hex = address_hex(&account);
                    self.update_state(|state| {
                        state.current_account = account_hex.clone();
                        state.network = network.clone();
                    });
                }
                Ok(None) => {}
                Err(SessionError::Provider(ProviderError::Unavailable)) => {
                    tracing::debug!("wallet provider not detected");
                }
                Err(error) => tracing::warn!(%error, "silent authorization check failed"),
            }
        };

        let count = async {
            let binding = self.contract.bind_for_read();
            match self.contract.read_minted_count(&binding).await {
                Ok(count) => self.update_state(|state| state.minted_count = count.to_string()),
                Err(error) => tracing::warn!(%error, "minted count read failed"),
            }
        };

        tokio::join!(silent, count);
    }

    /// Explicit user "connect" action.
    pub async fn connect(&self) -> Vec<Notice> {
        match self.session.request_authorization().await {
            Ok(auth) => {
                let account_hex = address_hex(&auth.account);
                self.update_state(|state| {
                    state.current_account = account_hex.clone();
                    state.network = Some(auth.network.clone());
                });
                self.install_subscription().await;

                let mut notices = vec![Notice::Connected {
                    account: account_hex,
                }];
                if let NetworkStatus::Mismatch { actual } = auth.network {
                    notices.push(Notice::NetworkMismatch {
                        actual,
                        required: self.session.required_chain_id().to_string(),
                    });
                }
                notices
            }
            Err(error) => vec![connect_failure(error)],
        }
    }

    /// Explicit user "mint" action.
    ///
    /// Strictly sequential: submit, await confirmation, then refresh the
    /// counter. The counter is only re-read after a successful
    /// confirmation; a failed mint leaves it untouched.
    pub async fn mint(&self) -> Vec<Notice> {
        let Some(account) = self.session.account() else {
            return vec![Notice::NotAuthenticated];
        };

        let binding = self.contract.bind_for_write(account);
        let request = MintRequest {
            value: self.mint_price,
        };

        let pending = match self.contract.mint(&binding, &request).await {
            Ok(pending) => pending,
            Err(error) => return vec![mint_failure(error, None)],
        };

        let mut notices = vec![Notice::MintSubmitted {
            tx_hash: pending.tx_hash.to_string(),
        }];

        match self.contract.await_confirmation(&pending).await {
            Ok(receipt) => {
                let token_id = receipt.events.first().map(|event| event.token_id.to_string());
                let viewer = token_id.as_ref().map(|id| {
                    viewer_link(
                        &self.viewer_base,
                        &address_hex(&self.contract.address()),
                        id,
                    )
                });
                notices.push(Notice::MintConfirmed {
                    tx_hash: receipt.tx_hash.to_string(),
                    token_id,
                    viewer_url: viewer,
                });
                self.refresh_minted_count().await;
            }
            Err(error) => {
                notices.push(mint_failure(error, Some(pending.tx_hash.to_string())));
            }
        }

        notices
    }

    /// (Re)register the mint-event subscription, cancelling any prior one.
    async fn install_subscription(&self) {
        let contract_hex = address_hex(&self.contract.address());
        let viewer_base = self.viewer_base.clone();
        let notices = self.notices.clone();

        let handler: MintEventHandler = Arc::new(move |event| {
            let token_id = event.token_id.to_string();
            let notice = Notice::MintObserved {
                minter: address_hex(&event.minter),
                viewer_url: viewer_link(&viewer_base, &contract_hex, &token_id),
                token_id,
            };
            let _ = notices.send(notice);
        });

        let subscription = self
            .contract
            .subscribe_to_mint_events(self.contract.bind_for_read(), handler);

        let mut slot = self.subscription.lock().await;
        if let Some(previous) = slot.replace(subscription) {
            previous.cancel();
        }
    }

    async fn refresh_minted_count(&self) {
        let binding = self.contract.bind_for_read();
        match self.contract.read_minted_count(&binding).await {
            Ok(count) => self.update_state(|state| state.minted_count = count.to_string()),
            Err(error) => tracing::warn!(%error, "minted count refresh failed"),
        }
    }

    fn update_state(&self, mutate: impl Fn(&mut FlowState)) {
        self.state.rcu(|current| {
            let mut next = FlowState::clone(current);
            mutate(&mut next);
            next
        });
    }
}

fn connect_failure(error: SessionError) -> Notice {
    match error {
        SessionError::Provider(ProviderError::Unavailable) => Notice::ProviderMissing,
        SessionError::Provider(ProviderError::Rejected) | SessionError::NoAccounts => {
            Notice::AuthorizationRejected
        }
        other => Notice::ActionFailed {
            action: "connect",
            reason: other.to_string(),
        },
    }
}

fn mint_failure(error: ContractError, tx_hash: Option<String>) -> Notice {
    match error {
        ContractError::Provider(ProviderError::Unavailable) => Notice::ProviderMissing,
        ContractError::Provider(ProviderError::Rejected) => Notice::MintRejected,
        ContractError::Reverted { hash } => Notice::MintFailed {
            reason: "transaction reverted".to_string(),
            tx_hash: Some(hash.to_string()),
        },
        other => Notice::MintFailed {
            reason: other.to_string(),
            tx_hash,
        },
    }
}
