//! Flow orchestration.
//!
//! # Data Flow
//! ```text
//! presentation action (connect / mint)
//!     → flow.rs (MintCoordinator: session + contract sequencing)
//!     → state.rs (FlowState snapshot, user-facing notices)
//! ```
//!
//! The coordinator is the single writer of all observable state. Every
//! failure from the session or contract layers is converted into a notice
//! at this boundary; nothing below it reaches the presentation layer raw.

pub mod flow;
pub mod state;

pub use flow::MintCoordinator;
pub use state::{FlowState, Notice};
