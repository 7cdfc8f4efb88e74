//! Wallet session management.
//!
//! Owns the current account and network identity. A session starts
//! `Unchecked`, becomes `Unauthenticated` or `Authenticated` after the
//! silent startup query, and only moves from `Unauthenticated` to
//! `Authenticated` through an explicit user-approved authorization request,
//! never automatically.

pub mod types;
pub mod wallet;

pub use types::{Authorization, NetworkStatus, SessionError, SessionState};
pub use wallet::WalletSession;
