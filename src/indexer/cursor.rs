//! Persisted per-network synced-height state machine.
//!
//! The cursor decides what a pass should do (initialize, advance, or idle)
//! from the persisted state and the observed tip, and owns the commit that
//! moves the synced height forward. Committed heights never decrease, and a
//! commit only happens after the pass has fully processed its range, so a
//! crash mid-pass re-reads the same range on restart.

use super::repositories::SyncStateRepository;
use super::types::{ChainSyncState, FilecoinNetwork, SyncError};
use std::sync::Arc;
use tracing::debug;

/// What a sync pass should do, decided from the cursor state and the tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
	/// No prior state: adopt the tip as the synced height without scanning
	/// history.
	Initialize { tip: u64 },
	/// Nothing new to process. Also chosen when the observed tip sits below
	/// the synced height (stale tip mid-pass); the next pass resolves it.
	AlreadySynced { height: u64 },
	/// Process the half-open height range `(from - 1, to]`, then commit
	/// `to`.
	Advance { from: u64, to: u64 },
}

/// Decide the action for one pass. Pure; all persistence happens through
/// `SyncCursor`.
pub fn plan(state: &ChainSyncState, tip: u64) -> SyncAction {
	match state.synced_height {
		None => SyncAction::Initialize { tip },
		Some(synced) if tip > synced => SyncAction::Advance {
			from: synced + 1,
			to: tip,
		},
		Some(synced) => SyncAction::AlreadySynced { height: synced },
	}
}

/// Owner of a network's `ChainSyncState` for the duration of one pass.
pub struct SyncCursor {
	state: ChainSyncState,
	repository: Arc<dyn SyncStateRepository>,
}

impl SyncCursor {
	/// Read (or create) the network's sync state. A failure here aborts the
	/// pass; the state on disk is untouched.
	pub async fn load(
		network: FilecoinNetwork,
		repository: Arc<dyn SyncStateRepository>,
	) -> Result<Self, SyncError> {
		let state = repository.load_or_create(network).await?;
		Ok(Self { state, repository })
	}

	pub fn state(&self) -> &ChainSyncState {
		&self.state
	}

	pub fn plan(&self, tip: u64) -> SyncAction {
		plan(&self.state, tip)
	}

	/// Persist a new synced height. The cursor never moves backward; a
	/// commit at or below the current height is ignored.
	pub async fn commit(&mut self, height: u64) -> Result<(), SyncError> {
		if let Some(synced) = self.state.synced_height {
			if height <= synced {
				debug!(
					"Ignoring non-advancing commit to {} (synced height is {})",
					height, synced
				);
				return Ok(());
			}
		}

		self.state.synced_height = Some(height);
		self.repository.save(&self.state).await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::indexer::test_support::MemorySyncStateRepository;

	fn state(synced_height: Option<u64>) -> ChainSyncState {
		ChainSyncState {
			network: FilecoinNetwork::Mainnet,
			synced_height,
		}
	}

	#[test]
	fn uninitialized_state_adopts_the_tip() {
		assert_eq!(plan(&state(None), 500), SyncAction::Initialize { tip: 500 });
	}

	#[test]
	fn matching_tip_is_a_noop() {
		assert_eq!(
			plan(&state(Some(500)), 500),
			SyncAction::AlreadySynced { height: 500 }
		);
	}

	#[test]
	fn higher_tip_advances_over_the_open_range() {
		assert_eq!(
			plan(&state(Some(490)), 500),
			SyncAction::Advance { from: 491, to: 500 }
		);
	}

	#[test]
	fn stale_tip_below_synced_height_is_a_noop() {
		assert_eq!(
			plan(&state(Some(510)), 500),
			SyncAction::AlreadySynced { height: 510 }
		);
	}

	#[tokio::test]
	async fn commit_persists_and_never_moves_backward() {
		let repository = Arc::new(MemorySyncStateRepository::new());
		let mut cursor = SyncCursor::load(FilecoinNetwork::Mainnet, repository.clone())
			.await
			.unwrap();

		cursor.commit(500).await.unwrap();
		assert_eq!(cursor.state().synced_height, Some(500));

		// Backwards and repeated commits are ignored.
		cursor.commit(490).await.unwrap();
		cursor.commit(500).await.unwrap();
		assert_eq!(cursor.state().synced_height, Some(500));

		let persisted = repository
			.load_or_create(FilecoinNetwork::Mainnet)
			.await
			.unwrap();
		assert_eq!(persisted.synced_height, Some(500));

		cursor.commit(510).await.unwrap();
		assert_eq!(cursor.state().synced_height, Some(510));
	}
}
