//! Lotus JSON-RPC integration.
//!
//! This module provides the client and wire types for talking to a Filecoin
//! node over JSON-RPC. The chain is queried through the `ChainRpc` trait so
//! the sync core never depends on the concrete transport.

/// JSON-RPC client for a Filecoin node
mod client;
/// Wire type definitions for RPC requests and responses
mod types;

pub use client::{ChainRpc, LotusClient};
pub use types::*;
