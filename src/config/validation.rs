//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Returns all validation errors, not just the first.

use alloy::primitives::Address;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(url) = &config.wallet.provider_url {
        if Url::parse(url).is_err() {
            errors.push(ValidationError::new(
                "wallet.provider_url",
                format!("'{url}' is not a valid URL"),
            ));
        }
    }

    if !is_hex_chain_id(&config.wallet.required_chain_id) {
        errors.push(ValidationError::new(
            "wallet.required_chain_id",
            format!(
                "'{}' must be a 0x-prefixed hex chain id",
                config.wallet.required_chain_id
            ),
        ));
    }

    if Url::parse(&config.rpc.url).is_err() {
        errors.push(ValidationError::new(
            "rpc.url",
            format!("'{}' is not a valid URL", config.rpc.url),
        ));
    }

    if config.rpc.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "rpc.request_timeout_secs",
            "must be at least 1",
        ));
    }

    if config.rpc.receipt_poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "rpc.receipt_poll_interval_ms",
            "must be at least 1",
        ));
    }

    if config.rpc.event_poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "rpc.event_poll_interval_ms",
            "must be at least 1",
        ));
    }

    if config.contract.address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "contract.address",
            format!("'{}' is not a valid address", config.contract.address),
        ));
    }

    if config.contract.total_supply == 0 {
        errors.push(ValidationError::new(
            "contract.total_supply",
            "must be at least 1",
        ));
    }

    if config.contract.viewer_base_url.is_empty() {
        errors.push(ValidationError::new(
            "contract.viewer_base_url",
            "must not be empty",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_hex_chain_id(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
