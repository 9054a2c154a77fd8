//! Deduplicating deposit persistence.
//!
//! Both discovery sources funnel through `record`, which makes the
//! two-source design safe against double-counting: whichever source sees a
//! transaction first wins, and every later discovery of the same CID is a
//! no-op.

use super::repositories::TransactionRepository;
use super::types::{Asset, ChainSyncState, DepositCandidate, FilecoinTransaction, SyncError};
use crate::utils::format_fil_amount;
use std::sync::Arc;
use tracing::info;

/// The single deduplication and persistence point for discovered deposits.
pub struct DepositRecorder {
	transactions: Arc<dyn TransactionRepository>,
}

impl DepositRecorder {
	pub fn new(transactions: Arc<dyn TransactionRepository>) -> Self {
		Self { transactions }
	}

	/// Persist a candidate unless a transaction with the same CID already
	/// exists. Returns whether a new row was written.
	pub async fn record(
		&self,
		candidate: DepositCandidate,
		state: &ChainSyncState,
		asset: &Asset,
	) -> Result<bool, SyncError> {
		if self
			.transactions
			.find_by_cid(&candidate.cid)
			.await?
			.is_some()
		{
			return Ok(false);
		}

		let amount = format_fil_amount(&candidate.amount);
		let transaction = FilecoinTransaction::from_candidate(candidate, state, asset);
		self.transactions.save(&transaction).await?;

		info!(
			"Recorded deposit {} of {} {} to {} on {}",
			transaction.cid, amount, transaction.asset, transaction.to, transaction.network
		);
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::indexer::test_support::MemoryTransactionRepository;
	use crate::indexer::types::FilecoinNetwork;

	fn candidate(cid: &str) -> DepositCandidate {
		DepositCandidate {
			cid: cid.to_string(),
			to: "t1v2ftlxhedyoijv7uqgxfygiziaqz23lgkvks77i".to_string(),
			amount: "1000000000000000000".to_string(),
			params: None,
			block_height: 500,
			nonce: 1,
		}
	}

	fn sync_state() -> ChainSyncState {
		ChainSyncState {
			network: FilecoinNetwork::Testnet,
			synced_height: Some(490),
		}
	}

	fn fil() -> Asset {
		Asset {
			name: "FIL".to_string(),
		}
	}

	#[tokio::test]
	async fn records_new_candidate_once() {
		let repository = Arc::new(MemoryTransactionRepository::new());
		let recorder = DepositRecorder::new(repository.clone());

		let inserted = recorder
			.record(candidate("cid-a"), &sync_state(), &fil())
			.await
			.unwrap();
		assert!(inserted);

		let rows = repository.rows();
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].cid, "cid-a");
		assert_eq!(rows[0].asset, "FIL");
		assert_eq!(rows[0].network, FilecoinNetwork::Testnet);
		assert_eq!(rows[0].synced_height, Some(490));
	}

	#[tokio::test]
	async fn duplicate_cid_is_a_noop() {
		let repository = Arc::new(MemoryTransactionRepository::new());
		let recorder = DepositRecorder::new(repository.clone());

		assert!(
			recorder
				.record(candidate("cid-a"), &sync_state(), &fil())
				.await
				.unwrap()
		);

		// Same CID rediscovered later (possibly by the other source, with a
		// different attributed height) must not write again.
		let mut rediscovered = candidate("cid-a");
		rediscovered.block_height = 491;
		assert!(
			!recorder
				.record(rediscovered, &sync_state(), &fil())
				.await
				.unwrap()
		);

		assert_eq!(repository.rows().len(), 1);
		assert_eq!(repository.rows()[0].block_height, 500);
	}
}
