//! Persistence trait seams and their file-based implementations.
//!
//! The sync core only talks to storage through these traits; the production
//! implementations keep pretty-printed JSON files under a data directory.
//! Schema and migrations of a real database are a bootstrap concern and stay
//! outside this crate.

use super::types::{Asset, ChainSyncState, FilecoinNetwork, FilecoinTransaction, SyncError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Store of recorded deposits, keyed by CID.
#[async_trait::async_trait]
pub trait TransactionRepository: Send + Sync {
	async fn find_by_cid(&self, cid: &str) -> Result<Option<FilecoinTransaction>, SyncError>;
	async fn save(&self, transaction: &FilecoinTransaction) -> Result<(), SyncError>;
}

/// Store of per-network sync progress.
#[async_trait::async_trait]
pub trait SyncStateRepository: Send + Sync {
	/// Load the network's sync state, creating an uninitialized one if none
	/// exists yet.
	async fn load_or_create(&self, network: FilecoinNetwork) -> Result<ChainSyncState, SyncError>;
	async fn save(&self, state: &ChainSyncState) -> Result<(), SyncError>;
}

/// Read-only asset lookup. A missing asset is `AssetNotFound`, which aborts
/// the pass but not the process.
#[async_trait::async_trait]
pub trait AssetRepository: Send + Sync {
	async fn find_by_name(&self, name: &str) -> Result<Asset, SyncError>;
}

fn store_error(context: &str, err: impl std::fmt::Display) -> SyncError {
	SyncError::StateStore(format!("{context}: {err}"))
}

/// File-based implementation of `TransactionRepository`.
///
/// One JSON file per network holding every recorded transaction. Read on
/// lookup, rewritten on save; deposit volume for a fixed watched set is
/// small enough that this stays cheap.
pub struct FileTransactionRepository {
	data_dir: PathBuf,
	network: FilecoinNetwork,
}

impl FileTransactionRepository {
	pub fn new(data_dir: PathBuf, network: FilecoinNetwork) -> Self {
		Self { data_dir, network }
	}

	fn transactions_filename(&self) -> PathBuf {
		self.data_dir
			.join(format!("transactions_{}.json", self.network))
	}

	async fn load_all(&self) -> Result<Vec<FilecoinTransaction>, SyncError> {
		let filename = self.transactions_filename();
		if !filename.exists() {
			return Ok(Vec::new());
		}

		let content = tokio::fs::read_to_string(&filename)
			.await
			.map_err(|e| store_error("Failed to read transactions file", e))?;

		serde_json::from_str(&content)
			.map_err(|e| store_error("Failed to parse transactions file", e))
	}
}

#[async_trait::async_trait]
impl TransactionRepository for FileTransactionRepository {
	async fn find_by_cid(&self, cid: &str) -> Result<Option<FilecoinTransaction>, SyncError> {
		let transactions = self.load_all().await?;
		Ok(transactions.into_iter().find(|tx| tx.cid == cid))
	}

	async fn save(&self, transaction: &FilecoinTransaction) -> Result<(), SyncError> {
		let mut transactions = self.load_all().await?;
		transactions.push(transaction.clone());

		let content = serde_json::to_string_pretty(&transactions)
			.map_err(|e| store_error("Failed to serialize transactions", e))?;

		let filename = self.transactions_filename();
		tokio::fs::write(&filename, content)
			.await
			.map_err(|e| store_error("Failed to write transactions file", e))?;

		info!(
			"Saved transaction {} to {:?} ({} total)",
			transaction.cid,
			filename,
			transactions.len()
		);
		Ok(())
	}
}

/// Sync state as stored on disk, with a write timestamp for operators.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSyncState {
	#[serde(flatten)]
	state: ChainSyncState,
	updated_at: String,
}

/// File-based implementation of `SyncStateRepository`.
pub struct FileSyncStateRepository {
	data_dir: PathBuf,
}

impl FileSyncStateRepository {
	pub fn new(data_dir: PathBuf) -> Self {
		Self { data_dir }
	}

	fn state_filename(&self, network: FilecoinNetwork) -> PathBuf {
		self.data_dir.join(format!("chain_state_{network}.json"))
	}
}

#[async_trait::async_trait]
impl SyncStateRepository for FileSyncStateRepository {
	async fn load_or_create(&self, network: FilecoinNetwork) -> Result<ChainSyncState, SyncError> {
		let filename = self.state_filename(network);
		if !filename.exists() {
			let state = ChainSyncState::uninitialized(network);
			self.save(&state).await?;
			return Ok(state);
		}

		let content = tokio::fs::read_to_string(&filename)
			.await
			.map_err(|e| store_error("Failed to read sync state file", e))?;

		let stored: StoredSyncState = serde_json::from_str(&content)
			.map_err(|e| store_error("Failed to parse sync state file", e))?;

		Ok(stored.state)
	}

	async fn save(&self, state: &ChainSyncState) -> Result<(), SyncError> {
		let stored = StoredSyncState {
			state: state.clone(),
			updated_at: chrono::Utc::now().to_rfc3339(),
		};

		let content = serde_json::to_string_pretty(&stored)
			.map_err(|e| store_error("Failed to serialize sync state", e))?;

		let filename = self.state_filename(state.network);
		tokio::fs::write(&filename, content)
			.await
			.map_err(|e| store_error("Failed to write sync state file", e))?;

		info!(
			"Saved sync state for {} at height {:?}",
			state.network, state.synced_height
		);
		Ok(())
	}
}

/// File-based implementation of `AssetRepository`, reading a JSON list of
/// assets seeded at bootstrap.
pub struct FileAssetRepository {
	data_dir: PathBuf,
}

impl FileAssetRepository {
	pub fn new(data_dir: PathBuf) -> Self {
		Self { data_dir }
	}

	fn assets_filename(&self) -> PathBuf {
		self.data_dir.join("assets.json")
	}

	/// Write the default asset list if none exists. Called once from
	/// bootstrap; this service otherwise never creates assets.
	pub fn seed_defaults(data_dir: &std::path::Path) -> std::io::Result<()> {
		let filename = data_dir.join("assets.json");
		if filename.exists() {
			return Ok(());
		}
		let assets = vec![Asset {
			name: "FIL".to_string(),
		}];
		std::fs::write(
			filename,
			serde_json::to_string_pretty(&assets).expect("static asset list serializes"),
		)
	}
}

#[async_trait::async_trait]
impl AssetRepository for FileAssetRepository {
	async fn find_by_name(&self, name: &str) -> Result<Asset, SyncError> {
		let filename = self.assets_filename();
		if !filename.exists() {
			return Err(SyncError::AssetNotFound(name.to_string()));
		}

		let content = tokio::fs::read_to_string(&filename)
			.await
			.map_err(|e| store_error("Failed to read assets file", e))?;

		let assets: Vec<Asset> = serde_json::from_str(&content)
			.map_err(|e| store_error("Failed to parse assets file", e))?;

		assets
			.into_iter()
			.find(|asset| asset.name == name)
			.ok_or_else(|| SyncError::AssetNotFound(name.to_string()))
	}
}
