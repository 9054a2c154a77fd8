//!
//! HTTP client for the Filfox explorer's address-messages API.
//!
//! Filfox lists an address's messages independently of any height range,
//! which makes it a useful cross-check against the chain-query path: a
//! deposit missed by one source is still picked up by the other, and the
//! recorder's CID deduplication keeps the overlap harmless.

use super::types::{ExplorerError, ExplorerMessage, MessagesResponse};
use crate::indexer::{DepositCandidate, FilecoinNetwork};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const FILFOX_URL: &str = "https://filfox.info/api/v1";

/// Explorer view of an address's inbound deposits.
///
/// Returns one page of candidates plus the total message count the explorer
/// reports for the address, so callers can bound their paging.
#[async_trait::async_trait]
pub trait DepositExplorer: Send + Sync {
	async fn fetch_deposits(
		&self,
		address: &str,
		params_filter: Option<&str>,
		page: u64,
		page_size: u64,
	) -> Result<(Vec<DepositCandidate>, u64), ExplorerError>;
}

/// Production `DepositExplorer` implementation over the Filfox HTTP API.
#[derive(Debug, Clone)]
pub struct FilfoxClient {
	http_client: Client,
	base_url: String,
}

impl FilfoxClient {
	/// Create a client for the given network.
	///
	/// Filfox only serves mainnet; any other network fails with
	/// `UnsupportedNetwork` here rather than at call time.
	pub fn new(network: FilecoinNetwork) -> Result<Self, ExplorerError> {
		if network != FilecoinNetwork::Mainnet {
			return Err(ExplorerError::UnsupportedNetwork(network));
		}

		let http_client = Client::builder()
			.timeout(Duration::from_secs(60))
			.build()
			.expect("Failed to create HTTP client");

		Ok(Self {
			http_client,
			base_url: FILFOX_URL.to_string(),
		})
	}
}

#[async_trait::async_trait]
impl DepositExplorer for FilfoxClient {
	async fn fetch_deposits(
		&self,
		address: &str,
		params_filter: Option<&str>,
		page: u64,
		page_size: u64,
	) -> Result<(Vec<DepositCandidate>, u64), ExplorerError> {
		let url = format!(
			"{}/address/{}/messages?pageSize={}&page={}&detailed",
			self.base_url, address, page_size, page
		);
		debug!("Fetching explorer messages from {url}");

		let response = self.http_client.get(&url).send().await?;

		if !response.status().is_success() {
			return Err(ExplorerError::Unavailable(format!(
				"HTTP error: {}",
				response.status()
			)));
		}

		let body: MessagesResponse = response
			.json()
			.await
			.map_err(|e| ExplorerError::Malformed(e.to_string()))?;

		let page = match body {
			MessagesResponse::Messages(page) => page,
			MessagesResponse::Error(payload) => {
				return Err(ExplorerError::Malformed(format!(
					"Unable to fetch Filecoin messages: {}",
					payload.error
				)));
			}
		};

		let deposits = deposits_from_messages(page.messages, address, params_filter);
		Ok((deposits, page.total_count))
	}
}

/// Reduce a page of explorer messages to deposit candidates: keep messages
/// whose recipient is exactly the queried address and, when a params filter
/// is given, whose encoded params match it exactly.
pub fn deposits_from_messages(
	messages: Vec<ExplorerMessage>,
	address: &str,
	params_filter: Option<&str>,
) -> Vec<DepositCandidate> {
	messages
		.into_iter()
		.filter(|message| message.to == address)
		.filter(|message| match params_filter {
			Some(filter) => message.params.as_deref() == Some(filter),
			None => true,
		})
		.map(|message| DepositCandidate {
			cid: message.cid,
			to: message.to,
			amount: message.value,
			params: message.params,
			block_height: message.height,
			nonce: message.nonce,
		})
		.collect()
}
