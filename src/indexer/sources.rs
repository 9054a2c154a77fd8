//! Chain-query discovery path.
//!
//! The primary source runs on every pass: it lists the CIDs of messages
//! addressed to a watched address since the cursor's synced height, then
//! fetches each message's full detail and shapes it into a candidate. The
//! secondary, explorer-backed path is consumed through the
//! `DepositExplorer` trait in the `explorer` module.

use super::address::normalize_address;
use super::types::{DepositCandidate, FilecoinNetwork, SyncError};
use crate::rpc::{ChainRpc, Cid};
use itertools::Itertools;
use std::sync::Arc;
use tracing::debug;

/// The authoritative chain-query path, used on every pass.
pub struct PrimarySource {
	rpc: Arc<dyn ChainRpc>,
	network: FilecoinNetwork,
}

impl PrimarySource {
	pub fn new(rpc: Arc<dyn ChainRpc>, network: FilecoinNetwork) -> Self {
		Self { rpc, network }
	}

	/// CIDs of messages sent to `address` since `since_height`,
	/// deduplicated while preserving chain order.
	pub async fn list_deposit_cids(
		&self,
		address: &str,
		since_height: u64,
	) -> Result<Vec<Cid>, SyncError> {
		let cids = self.rpc.list_messages_to(address, since_height).await?;
		Ok(cids.into_iter().unique().collect())
	}

	/// Fetch one message's detail and shape it into a candidate, with
	/// recipient and sender normalized to the configured network's prefix.
	/// The candidate carries the pass's tip height.
	pub async fn fetch_deposit(
		&self,
		cid: &Cid,
		tip_height: u64,
	) -> Result<DepositCandidate, SyncError> {
		let message = self.rpc.get_message(cid).await?;

		let from = normalize_address(self.network, &message.from);
		debug!("Message {} sent by {}", cid, from);

		Ok(DepositCandidate {
			cid: cid.root.clone(),
			to: normalize_address(self.network, &message.to),
			amount: message.value,
			params: message.params,
			block_height: tip_height,
			nonce: message.nonce,
		})
	}
}
