//! Provider trait and error definitions.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur at the provider boundary.
///
/// Every raw transport failure is converted to one of these before it
/// leaves the gateway; callers never see reqwest or serde errors directly.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No wallet provider is configured or reachable.
    #[error("no wallet provider available")]
    Unavailable,

    /// The user declined the request in their wallet.
    #[error("request rejected by user")]
    Rejected,

    /// RPC or transport failure.
    #[error("RPC error: {0}")]
    Rpc(String),
}

/// JSON-RPC request/response access to an external wallet or node.
///
/// Implementations must be cheap to share; callers hold them behind `Arc`.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Whether the underlying transport exists at all.
    fn is_available(&self) -> bool;

    /// Perform a single JSON-RPC call and return the `result` payload.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
}

/// Stand-in used when no wallet endpoint is configured.
///
/// Reports itself unavailable and fails every request without any I/O, so
/// dependent operations short-circuit instead of prompting.
pub struct AbsentGateway;

#[async_trait]
impl ProviderGateway for AbsentGateway {
    fn is_available(&self) -> bool {
        false
    }

    async fn request(&self, _method: &str, _params: Value) -> Result<Value, ProviderError> {
        Err(ProviderError::Unavailable)
    }
}
