//! Collection contract integration.
//!
//! # Data Flow
//! ```text
//! ContractClient (fixed address + typed interface)
//!     → client.rs (bindings, mint submission, confirmation, reads)
//!     → events.rs (log polling behind a cancellable subscription)
//!     → types.rs (wire types, errors, hex codecs)
//! ```
//!
//! State-mutating calls go through the wallet gateway (the wallet signs);
//! reads, receipt polls, and log queries go through the read-only node
//! gateway so they work without any wallet installed.

pub mod client;
pub mod events;
pub mod types;

pub use client::{ContractClient, ReadBinding, TokenMinted, WriteBinding};
pub use events::{EventSubscription, MintEventHandler};
pub use types::{ContractError, MintEvent, MintReceipt, MintRequest, PendingMint};
