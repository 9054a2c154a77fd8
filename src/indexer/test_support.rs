//! Shared fakes for exercising the sync core without a node, an explorer,
//! or a disk.

use super::repositories::{AssetRepository, SyncStateRepository, TransactionRepository};
use super::types::{
	Asset, ChainSyncState, DepositCandidate, FilecoinNetwork, FilecoinTransaction, SyncError,
};
use crate::explorer::{DepositExplorer, ExplorerError};
use crate::rpc::{ChainRpc, Cid, MessageDetail, RpcError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Scriptable in-memory `ChainRpc`.
pub(crate) struct FakeChainRpc {
	inner: Mutex<FakeChainRpcInner>,
}

struct FakeChainRpcInner {
	height: u64,
	chain_head_calls: usize,
	fail_chain_head: bool,
	messages: HashMap<String, Vec<Cid>>,
	details: HashMap<String, MessageDetail>,
	fail_list_for: HashSet<String>,
	fail_get: HashSet<String>,
}

impl FakeChainRpc {
	pub fn new(height: u64) -> Self {
		Self {
			inner: Mutex::new(FakeChainRpcInner {
				height,
				chain_head_calls: 0,
				fail_chain_head: false,
				messages: HashMap::new(),
				details: HashMap::new(),
				fail_list_for: HashSet::new(),
				fail_get: HashSet::new(),
			}),
		}
	}

	pub fn set_height(&self, height: u64) {
		self.inner.lock().unwrap().height = height;
	}

	pub fn chain_head_calls(&self) -> usize {
		self.inner.lock().unwrap().chain_head_calls
	}

	pub fn fail_chain_head(&self) {
		self.inner.lock().unwrap().fail_chain_head = true;
	}

	pub fn add_messages(&self, address: &str, cids: Vec<Cid>) {
		self.inner
			.lock()
			.unwrap()
			.messages
			.insert(address.to_string(), cids);
	}

	pub fn add_detail(&self, cid: &str, detail: MessageDetail) {
		self.inner
			.lock()
			.unwrap()
			.details
			.insert(cid.to_string(), detail);
	}

	pub fn fail_listing_for(&self, address: &str) {
		self.inner
			.lock()
			.unwrap()
			.fail_list_for
			.insert(address.to_string());
	}

	pub fn restore_listing_for(&self, address: &str) {
		self.inner.lock().unwrap().fail_list_for.remove(address);
	}

	pub fn fail_get_message(&self, cid: &str) {
		self.inner.lock().unwrap().fail_get.insert(cid.to_string());
	}
}

#[async_trait::async_trait]
impl ChainRpc for FakeChainRpc {
	async fn chain_head(&self) -> Result<u64, RpcError> {
		let mut inner = self.inner.lock().unwrap();
		if inner.fail_chain_head {
			return Err(RpcError::Unavailable("chain head unavailable".to_string()));
		}
		inner.chain_head_calls += 1;
		Ok(inner.height)
	}

	async fn list_messages_to(
		&self,
		address: &str,
		_since_height: u64,
	) -> Result<Vec<Cid>, RpcError> {
		let inner = self.inner.lock().unwrap();
		if inner.fail_list_for.contains(address) {
			return Err(RpcError::Unavailable(format!(
				"listing unavailable for {address}"
			)));
		}
		Ok(inner.messages.get(address).cloned().unwrap_or_default())
	}

	async fn get_message(&self, cid: &Cid) -> Result<MessageDetail, RpcError> {
		let inner = self.inner.lock().unwrap();
		if inner.fail_get.contains(&cid.root) {
			return Err(RpcError::Unavailable(format!(
				"message fetch unavailable for {cid}"
			)));
		}
		inner
			.details
			.get(&cid.root)
			.cloned()
			.ok_or_else(|| RpcError::NotFound(format!("message {cid}")))
	}
}

/// Scriptable in-memory `DepositExplorer`.
pub(crate) struct FakeExplorer {
	inner: Mutex<FakeExplorerInner>,
}

struct FakeExplorerInner {
	deposits: Vec<DepositCandidate>,
	fail: bool,
	calls: usize,
}

impl FakeExplorer {
	pub fn new(deposits: Vec<DepositCandidate>) -> Self {
		Self {
			inner: Mutex::new(FakeExplorerInner {
				deposits,
				fail: false,
				calls: 0,
			}),
		}
	}

	pub fn failing() -> Self {
		let explorer = Self::new(Vec::new());
		explorer.inner.lock().unwrap().fail = true;
		explorer
	}

	pub fn calls(&self) -> usize {
		self.inner.lock().unwrap().calls
	}
}

#[async_trait::async_trait]
impl DepositExplorer for FakeExplorer {
	async fn fetch_deposits(
		&self,
		_address: &str,
		_params_filter: Option<&str>,
		_page: u64,
		_page_size: u64,
	) -> Result<(Vec<DepositCandidate>, u64), ExplorerError> {
		let mut inner = self.inner.lock().unwrap();
		inner.calls += 1;
		if inner.fail {
			return Err(ExplorerError::Unavailable("explorer down".to_string()));
		}
		let total = inner.deposits.len() as u64;
		Ok((inner.deposits.clone(), total))
	}
}

/// In-memory `TransactionRepository`.
pub(crate) struct MemoryTransactionRepository {
	rows: Mutex<Vec<FilecoinTransaction>>,
}

impl MemoryTransactionRepository {
	pub fn new() -> Self {
		Self {
			rows: Mutex::new(Vec::new()),
		}
	}

	pub fn rows(&self) -> Vec<FilecoinTransaction> {
		self.rows.lock().unwrap().clone()
	}
}

#[async_trait::async_trait]
impl TransactionRepository for MemoryTransactionRepository {
	async fn find_by_cid(&self, cid: &str) -> Result<Option<FilecoinTransaction>, SyncError> {
		Ok(self
			.rows
			.lock()
			.unwrap()
			.iter()
			.find(|tx| tx.cid == cid)
			.cloned())
	}

	async fn save(&self, transaction: &FilecoinTransaction) -> Result<(), SyncError> {
		self.rows.lock().unwrap().push(transaction.clone());
		Ok(())
	}
}

/// In-memory `SyncStateRepository`.
pub(crate) struct MemorySyncStateRepository {
	states: Mutex<HashMap<FilecoinNetwork, ChainSyncState>>,
}

impl MemorySyncStateRepository {
	pub fn new() -> Self {
		Self {
			states: Mutex::new(HashMap::new()),
		}
	}

	/// Seed or overwrite a network's state, e.g. to replay a range as if a
	/// commit had been lost to a crash.
	pub fn set_state(&self, state: ChainSyncState) {
		self.states.lock().unwrap().insert(state.network, state);
	}

	pub fn state(&self, network: FilecoinNetwork) -> Option<ChainSyncState> {
		self.states.lock().unwrap().get(&network).cloned()
	}
}

#[async_trait::async_trait]
impl SyncStateRepository for MemorySyncStateRepository {
	async fn load_or_create(&self, network: FilecoinNetwork) -> Result<ChainSyncState, SyncError> {
		Ok(self
			.states
			.lock()
			.unwrap()
			.entry(network)
			.or_insert_with(|| ChainSyncState::uninitialized(network))
			.clone())
	}

	async fn save(&self, state: &ChainSyncState) -> Result<(), SyncError> {
		self.states
			.lock()
			.unwrap()
			.insert(state.network, state.clone());
		Ok(())
	}
}

/// Fixed-content `AssetRepository`.
pub(crate) struct StaticAssetRepository {
	assets: Vec<Asset>,
}

impl StaticAssetRepository {
	pub fn with_fil() -> Self {
		Self {
			assets: vec![Asset {
				name: "FIL".to_string(),
			}],
		}
	}

	pub fn empty() -> Self {
		Self { assets: Vec::new() }
	}
}

#[async_trait::async_trait]
impl AssetRepository for StaticAssetRepository {
	async fn find_by_name(&self, name: &str) -> Result<Asset, SyncError> {
		self.assets
			.iter()
			.find(|asset| asset.name == name)
			.cloned()
			.ok_or_else(|| SyncError::AssetNotFound(name.to_string()))
	}
}
