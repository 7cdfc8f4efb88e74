//! Mint-event subscription.
//!
//! Polls the node for the contract's mint logs, advancing a block cursor,
//! and delivers each decoded event to the registered handler. The returned
//! subscription is a capability: cancelling or dropping it stops the poll
//! task, so repeated connects never stack duplicate handlers.

use std::sync::Arc;
use std::time::Duration;

use alloy::sol_types::SolEvent;
use serde_json::json;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::contract::client::{decode_mint_log, ReadBinding, TokenMinted};
use crate::contract::types::{address_hex, parse_quantity, quantity_hex, ContractError, MintEvent};

/// Callback invoked for every decoded mint event.
pub type MintEventHandler = Arc<dyn Fn(MintEvent) + Send + Sync>;

/// Handle to a running mint-event poll task.
pub struct EventSubscription {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl EventSubscription {
    /// Stop the poll task. Dropping the handle has the same effect.
    pub fn cancel(self) {}

    /// Whether the poll task is still running.
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.task.abort();
    }
}

/// Spawn the poll task for one binding + handler pair.
pub(crate) fn spawn(
    binding: ReadBinding,
    handler: MintEventHandler,
    poll_interval: Duration,
) -> EventSubscription {
    let (stop_tx, stop_rx) = oneshot::channel();
    let task = tokio::spawn(run(binding, handler, poll_interval, stop_rx));

    EventSubscription {
        stop: Some(stop_tx),
        task,
    }
}

async fn run(
    binding: ReadBinding,
    handler: MintEventHandler,
    poll_interval: Duration,
    mut stop: oneshot::Receiver<()>,
) {
    tracing::info!(
        contract = %address_hex(&binding.address),
        "mint event subscription started"
    );

    let mut watcher = LogWatcher {
        binding,
        cursor: None,
    };
    let mut ticker = interval(poll_interval);

    loop {
        tokio::select! {
            _ = &mut stop => {
                tracing::debug!("mint event subscription cancelled");
                break;
            }
            _ = ticker.tick() => {
                if let Err(error) = watcher.poll_once(&handler).await {
                    tracing::warn!(%error, "mint event poll failed");
                }
            }
        }
    }
}

struct LogWatcher {
    binding: ReadBinding,
    /// Last block already scanned. None until the first successful poll.
    cursor: Option<u64>,
}

impl LogWatcher {
    async fn poll_once(&mut self, handler: &MintEventHandler) -> Result<(), ContractError> {
        let head = parse_quantity(
            &self
                .binding
                .gateway
                .request("eth_blockNumber", json!([]))
                .await?,
        )?;

        // The first poll only records where the chain is; history before
        // the subscription existed is not replayed.
        let Some(cursor) = self.cursor else {
            self.cursor = Some(head);
            return Ok(());
        };

        if head <= cursor {
            return Ok(());
        }

        let filter = json!([{
            "address": address_hex(&self.binding.address),
            "fromBlock": quantity_hex(cursor + 1),
            "toBlock": quantity_hex(head),
            "topics": [TokenMinted::SIGNATURE_HASH.to_string()],
        }]);

        let logs = self.binding.gateway.request("eth_getLogs", filter).await?;
        let entries = logs
            .as_array()
            .ok_or_else(|| ContractError::Response("log list is not an array".to_string()))?;

        for log in entries {
            match decode_mint_log(log, self.binding.address) {
                Ok(Some(event)) => {
                    tracing::info!(
                        minter = %address_hex(&event.minter),
                        token_id = %event.token_id,
                        "mint event observed"
                    );
                    handler(event);
                }
                Ok(None) => {}
                Err(error) => tracing::warn!(%error, "skipping undecodable log"),
            }
        }

        self.cursor = Some(head);
        Ok(())
    }
}
