//! Filfox explorer integration.
//!
//! The explorer is an independent, mainnet-only view of an address's inbound
//! messages, used as a low-frequency cross-check against the chain RPC path.
//! It is consumed through the `DepositExplorer` trait so the sync core never
//! depends on the concrete HTTP client.

/// HTTP client for the Filfox address-messages API
mod client;
/// Payload type definitions for explorer responses
mod types;

pub use client::{DepositExplorer, FilfoxClient};
pub use types::*;
