//! Poll loop and single-pass driver for one network.
//!
//! `DepositIndexer` wires together the height oracle, the cursor, both
//! discovery sources, and the recorder, and drives repeated sync passes with
//! a fixed inter-pass delay. Failure isolation follows two tiers:
//!
//! - Per-candidate failures (one message fetch or persist) are logged and
//!   skipped; the pass continues and still commits its height.
//! - A failed message listing for an address means the range was not fully
//!   processed, so the commit is deferred and the same range is retried on
//!   the next pass; dedup makes the replay idempotent.
//! - Height-fetch, asset, or cursor failures abort only the current pass,
//!   leaving the cursor untouched.
//!
//! The explorer cross-check runs at a much lower cadence than the primary
//! path, driven by an explicit pass counter threaded through the loop.

use super::cursor::{SyncAction, SyncCursor};
use super::height_oracle::HeightOracle;
use super::recorder::DepositRecorder;
use super::repositories::{AssetRepository, SyncStateRepository, TransactionRepository};
use super::sources::PrimarySource;
use super::types::{Asset, ChainSyncState, FilecoinNetwork, SyncError};
use crate::explorer::DepositExplorer;
use crate::rpc::ChainRpc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Passes between explorer reconciliation runs.
pub const RECONCILE_INTERVAL: u64 = 100;
/// Explorer page size used during reconciliation.
const RECONCILE_PAGE_SIZE: u64 = 10;
/// Pages read per reconciliation run. The explorer is a cross-check, not
/// the system of record, so only the first page is read.
const RECONCILE_MAX_PAGES: u64 = 1;
/// Delay between sync passes.
pub const POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Name of the asset recorded deposits are denominated in.
const ASSET_NAME: &str = "FIL";

/// Outcome of a single sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
	/// First pass ever: adopted the tip as the synced height without
	/// scanning history.
	Initialized { tip: u64 },
	/// The tip has not moved past the synced height.
	AlreadySynced { height: u64 },
	/// Fully processed `(from - 1, to]` and committed the new height.
	Advanced { from: u64, to: u64, recorded: usize },
	/// Processed what was reachable, but at least one address listing
	/// failed; the cursor was left unchanged for a retry.
	Incomplete { from: u64, to: u64, recorded: usize },
}

/// Deposit indexer for one network. Passes run strictly sequentially;
/// independent networks run independent instances sharing no mutable state.
pub struct DepositIndexer {
	network: FilecoinNetwork,
	watched_addresses: Vec<String>,
	height_oracle: HeightOracle,
	primary: PrimarySource,
	secondary: Option<Arc<dyn DepositExplorer>>,
	recorder: DepositRecorder,
	sync_states: Arc<dyn SyncStateRepository>,
	assets: Arc<dyn AssetRepository>,
	poll_interval: Duration,
}

impl DepositIndexer {
	pub fn new(
		network: FilecoinNetwork,
		watched_addresses: Vec<String>,
		rpc: Arc<dyn ChainRpc>,
		secondary: Option<Arc<dyn DepositExplorer>>,
		transactions: Arc<dyn TransactionRepository>,
		sync_states: Arc<dyn SyncStateRepository>,
		assets: Arc<dyn AssetRepository>,
	) -> Self {
		Self {
			network,
			watched_addresses,
			height_oracle: HeightOracle::new(rpc.clone()),
			primary: PrimarySource::new(rpc, network),
			secondary,
			recorder: DepositRecorder::new(transactions),
			sync_states,
			assets,
			poll_interval: POLL_INTERVAL,
		}
	}

	/// Override the inter-pass delay.
	pub fn with_poll_interval(mut self, interval: Duration) -> Self {
		self.poll_interval = interval;
		self
	}

	/// Run sync passes forever. A failed pass is logged and retried from
	/// the same persisted state on the next tick; nothing here is
	/// process-fatal.
	pub async fn run(&mut self) {
		info!("[{}] Starting deposit indexer", self.network);

		let mut pass_number = 0u64;
		loop {
			if let Err(e) = self.run_pass(pass_number).await {
				error!("[{}] Sync pass failed: {}", self.network, e);
			}
			pass_number += 1;
			tokio::time::sleep(self.poll_interval).await;
		}
	}

	/// Execute one sync pass: read the cursor, decide the action, discover
	/// deposits for every watched address, then commit the new height.
	pub async fn run_pass(&mut self, pass_number: u64) -> Result<PassOutcome, SyncError> {
		let mut cursor = SyncCursor::load(self.network, self.sync_states.clone()).await?;
		let asset = self.assets.find_by_name(ASSET_NAME).await?;
		let tip = self.height_oracle.current_height().await?;

		match cursor.plan(tip) {
			SyncAction::Initialize { tip } => {
				info!("[{}] Starting indexer from block {}", self.network, tip);
				cursor.commit(tip).await?;
				Ok(PassOutcome::Initialized { tip })
			}
			SyncAction::AlreadySynced { height } => {
				info!("[{}] Already synced up to {}", self.network, height);
				Ok(PassOutcome::AlreadySynced { height })
			}
			SyncAction::Advance { from, to } => {
				info!("[{}] Syncing from {} to {}", self.network, from, to);

				let mut recorded = 0usize;
				let mut fully_processed = true;

				for address in &self.watched_addresses {
					if pass_number % RECONCILE_INTERVAL == 0 {
						if let Some(explorer) = &self.secondary {
							match self
								.reconcile(explorer.as_ref(), address, cursor.state(), &asset)
								.await
							{
								Ok(found) => recorded += found,
								Err(e) => warn!(
									"[{}] Explorer reconciliation failed for {}: {}",
									self.network, address, e
								),
							}
						}
					}

					let cids = match self.primary.list_deposit_cids(address, from).await {
						Ok(cids) => cids,
						Err(e) => {
							warn!(
								"[{}] Failed to list messages for {}: {}",
								self.network, address, e
							);
							fully_processed = false;
							continue;
						}
					};

					for cid in cids {
						match self.primary.fetch_deposit(&cid, to).await {
							Ok(candidate) => {
								match self.recorder.record(candidate, cursor.state(), &asset).await
								{
									Ok(true) => recorded += 1,
									Ok(false) => {}
									Err(e) => warn!(
										"[{}] Failed to persist deposit {}: {}",
										self.network, cid, e
									),
								}
							}
							Err(e) => warn!(
								"[{}] Failed to fetch message {}: {}",
								self.network, cid, e
							),
						}
					}
				}

				if !fully_processed {
					info!(
						"[{}] Leaving synced height at {} for retry",
						self.network,
						from - 1
					);
					return Ok(PassOutcome::Incomplete { from, to, recorded });
				}

				cursor.commit(to).await?;
				info!(
					"[{}] Synced to {}, recorded {} new deposits",
					self.network, to, recorded
				);
				Ok(PassOutcome::Advanced { from, to, recorded })
			}
		}
	}

	/// Cross-check one address against the explorer. Reads a bounded number
	/// of pages and funnels every matching candidate through the recorder,
	/// where CID dedup protects against double-counting the primary path.
	async fn reconcile(
		&self,
		explorer: &dyn DepositExplorer,
		address: &str,
		state: &ChainSyncState,
		asset: &Asset,
	) -> Result<usize, SyncError> {
		let mut recorded = 0usize;
		let mut page = 0u64;

		while page < RECONCILE_MAX_PAGES {
			let (candidates, total_count) = explorer
				.fetch_deposits(address, None, page, RECONCILE_PAGE_SIZE)
				.await?;

			for candidate in candidates {
				let cid = candidate.cid.clone();
				match self.recorder.record(candidate, state, asset).await {
					Ok(true) => {
						info!(
							"[{}] Found transaction through explorer: {}",
							self.network, cid
						);
						recorded += 1;
					}
					Ok(false) => {}
					Err(e) => warn!(
						"[{}] Failed to persist explorer deposit {}: {}",
						self.network, cid, e
					),
				}
			}

			if (page + 1) * RECONCILE_PAGE_SIZE >= total_count {
				break;
			}
			page += 1;
		}

		Ok(recorded)
	}
}
