//! Memoized chain tip lookups.
//!
//! Sync passes can come in bursts (several networks, short poll intervals),
//! so the tip height is cached for a short TTL to bound query volume while
//! keeping staleness bounded. The cache is a value object with a pure
//! freshness predicate; it is never persisted and resets on restart.

use super::types::SyncError;
use crate::rpc::ChainRpc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a fetched tip height stays fresh.
pub const HEIGHT_CACHE_TTL: Duration = Duration::from_secs(10);

/// A tip height together with the instant it was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedHeight {
	pub height: u64,
	pub fetched_at: Instant,
}

impl CachedHeight {
	/// Whether this cached value is still usable at `now` under `ttl`.
	pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
		now.duration_since(self.fetched_at) < ttl
	}
}

/// Fetches the network's current tip height, memoized per instance.
pub struct HeightOracle {
	rpc: Arc<dyn ChainRpc>,
	cached: Option<CachedHeight>,
	ttl: Duration,
}

impl HeightOracle {
	pub fn new(rpc: Arc<dyn ChainRpc>) -> Self {
		Self::with_ttl(rpc, HEIGHT_CACHE_TTL)
	}

	pub fn with_ttl(rpc: Arc<dyn ChainRpc>, ttl: Duration) -> Self {
		Self {
			rpc,
			cached: None,
			ttl,
		}
	}

	/// The current tip height, served from cache while fresh.
	pub async fn current_height(&mut self) -> Result<u64, SyncError> {
		if let Some(cached) = &self.cached {
			if cached.is_fresh(Instant::now(), self.ttl) {
				debug!("Serving cached tip height {}", cached.height);
				return Ok(cached.height);
			}
		}

		let height = self.rpc.chain_head().await?;
		self.cached = Some(CachedHeight {
			height,
			fetched_at: Instant::now(),
		});

		Ok(height)
	}
}
