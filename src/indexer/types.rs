//! Domain types for deposit synchronization

use crate::explorer::ExplorerError;
use crate::rpc::RpcError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The Filecoin network variants this service can watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilecoinNetwork {
	Mainnet,
	Testnet,
}

impl fmt::Display for FilecoinNetwork {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FilecoinNetwork::Mainnet => f.write_str("mainnet"),
			FilecoinNetwork::Testnet => f.write_str("testnet"),
		}
	}
}

/// A deposit discovered by either source, before persistence.
///
/// Transient: candidates only exist within a sync pass and are never stored
/// directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositCandidate {
	/// Message CID; the deduplication key.
	pub cid: String,
	/// Recipient, normalized to the configured network's prefix.
	pub to: String,
	/// Decimal attoFIL string; values exceed `u64` so no arithmetic is
	/// done on them.
	pub amount: String,
	/// Base64-encoded message params, if any.
	pub params: Option<String>,
	/// Height the source attributes the message to.
	pub block_height: u64,
	pub nonce: u64,
}

/// A durably recorded deposit. Created once per CID per network, never
/// updated or deleted by this service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilecoinTransaction {
	pub cid: String,
	pub network: FilecoinNetwork,
	pub to: String,
	pub amount: String,
	pub params: Option<String>,
	pub block_height: u64,
	pub nonce: u64,
	/// Name of the asset this deposit is denominated in.
	pub asset: String,
	/// The cursor's synced height when this deposit was discovered.
	pub synced_height: Option<u64>,
}

impl FilecoinTransaction {
	/// Attribute a candidate to the sync pass that discovered it.
	pub fn from_candidate(
		candidate: DepositCandidate,
		state: &ChainSyncState,
		asset: &Asset,
	) -> Self {
		Self {
			cid: candidate.cid,
			network: state.network,
			to: candidate.to,
			amount: candidate.amount,
			params: candidate.params,
			block_height: candidate.block_height,
			nonce: candidate.nonce,
			asset: asset.name.clone(),
			synced_height: state.synced_height,
		}
	}
}

/// Per-network sync progress. `synced_height` is `None` until the first
/// pass adopts the chain tip; afterwards it is monotonically non-decreasing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainSyncState {
	pub network: FilecoinNetwork,
	pub synced_height: Option<u64>,
}

impl ChainSyncState {
	pub fn uninitialized(network: FilecoinNetwork) -> Self {
		Self {
			network,
			synced_height: None,
		}
	}
}

/// An asset deposits are denominated in. Looked up, never created, by this
/// service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Asset {
	pub name: String,
}

/// Errors surfaced during a sync pass.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
	#[error("chain rpc error: {0}")]
	Rpc(#[from] RpcError),

	#[error("explorer error: {0}")]
	Explorer(#[from] ExplorerError),

	/// The referenced asset is missing from the store. Fatal for the pass,
	/// not the process.
	#[error("asset not found: {0}")]
	AssetNotFound(String),

	/// The persistence collaborator failed to read or write.
	#[error("state store error: {0}")]
	StateStore(String),
}
