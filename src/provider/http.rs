//! HTTP JSON-RPC transport.
//!
//! # Responsibilities
//! - Speak JSON-RPC 2.0 over HTTP POST to a wallet agent or node endpoint
//! - Enforce a per-request timeout
//! - Map wire-level failures into the provider error taxonomy

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::provider::gateway::{ProviderError, ProviderGateway};

/// EIP-1193 error code for a user-rejected request.
const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC gateway over HTTP.
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    next_id: AtomicU64,
}

impl HttpGateway {
    /// Create a gateway for the given endpoint URL.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            timeout,
            next_id: AtomicU64::new(1),
        }
    }

    /// The endpoint this gateway talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ProviderGateway for HttpGateway {
    fn is_available(&self) -> bool {
        true
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(method, id, "provider request");

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Rpc(format!("transport error: {e}")))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Rpc(format!("invalid JSON-RPC response: {e}")))?;

        if let Some(error) = payload.get("error") {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            tracing::warn!(method, code, message, "provider returned error");
            return Err(classify_rpc_error(code, message));
        }

        match payload.get("result") {
            Some(result) => Ok(result.clone()),
            None => Err(ProviderError::Rpc(
                "JSON-RPC response missing result".to_string(),
            )),
        }
    }
}

/// Split user rejections out of the generic RPC error bucket.
fn classify_rpc_error(code: i64, message: &str) -> ProviderError {
    if code == USER_REJECTED_CODE {
        ProviderError::Rejected
    } else {
        ProviderError::Rpc(format!("{message} (code {code})"))
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}
