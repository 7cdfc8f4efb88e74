//! Wallet-connected minting client library.

pub mod config;
pub mod contract;
pub mod coordinator;
pub mod provider;
pub mod session;

pub use config::ClientConfig;
pub use coordinator::{FlowState, MintCoordinator, Notice};
pub use session::WalletSession;
