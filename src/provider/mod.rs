//! Wallet provider boundary.
//!
//! # Data Flow
//! ```text
//! config (wallet endpoint, node endpoint)
//!     → gateway.rs (ProviderGateway trait, error taxonomy)
//!     → http.rs (JSON-RPC 2.0 transport over reqwest)
//!     → session / contract (typed callers)
//! ```
//!
//! The wallet transport may be absent entirely; detection happens once at
//! startup and every dependent operation fails fast with
//! [`ProviderError::Unavailable`] instead of prompting or submitting.

pub mod gateway;
pub mod http;

use std::sync::Arc;
use std::time::Duration;

use crate::config::WalletConfig;

pub use gateway::{AbsentGateway, ProviderError, ProviderGateway};
pub use http::HttpGateway;

/// Detect the wallet provider from configuration.
///
/// Returns an [`HttpGateway`] when a wallet endpoint is configured,
/// otherwise an [`AbsentGateway`] that reports itself unavailable.
pub fn detect_wallet_gateway(
    config: &WalletConfig,
    timeout: Duration,
) -> Arc<dyn ProviderGateway> {
    match &config.provider_url {
        Some(url) => {
            tracing::debug!(endpoint = %url, "wallet provider configured");
            Arc::new(HttpGateway::new(url.clone(), timeout))
        }
        None => {
            tracing::debug!("no wallet provider configured");
            Arc::new(AbsentGateway)
        }
    }
}
