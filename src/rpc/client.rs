//!
//! JSON-RPC client for a Filecoin (Lotus-compatible) node.
//!
//! The sync core only ever talks to the chain through the `ChainRpc` trait:
//! the current tip height, the list of messages sent to an address since a
//! height, and full detail for a single message. `LotusClient` is the
//! production implementation, a JSON-RPC 2.0 client with bearer-token auth
//! and bounded retries on transport failures.

use super::types::{ChainHead, Cid, MessageDetail, MessageMatch, RpcError};
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Narrow view of the chain used by the sync core.
#[async_trait::async_trait]
pub trait ChainRpc: Send + Sync {
	/// Height of the current chain head.
	async fn chain_head(&self) -> Result<u64, RpcError>;

	/// CIDs of messages sent to `address`, walking back from the head down
	/// to `since_height`.
	async fn list_messages_to(
		&self,
		address: &str,
		since_height: u64,
	) -> Result<Vec<Cid>, RpcError>;

	/// Full detail for a single message.
	async fn get_message(&self, cid: &Cid) -> Result<MessageDetail, RpcError>;
}

/// Production `ChainRpc` implementation over HTTP JSON-RPC.
#[derive(Clone)]
pub struct LotusClient {
	/// The underlying HTTP client for JSON-RPC calls.
	http_client: Client,
	/// The node's JSON-RPC endpoint.
	rpc_url: String,
	/// Optional bearer token for authenticated endpoints.
	token: Option<String>,
}

impl LotusClient {
	/// Create a new client for the given endpoint.
	pub fn new(rpc_url: String, token: Option<String>) -> Self {
		let http_client = Client::builder()
			.timeout(Duration::from_secs(30))
			.build()
			.expect("Failed to create HTTP client");

		Self {
			http_client,
			rpc_url,
			token,
		}
	}

	/// Execute a JSON-RPC call, retrying transient transport failures with
	/// exponential backoff. The retry window is bounded so a dead node
	/// surfaces as `Unavailable` within one pass rather than hanging it.
	async fn request(
		&self,
		method: &str,
		params: serde_json::Value,
	) -> Result<serde_json::Value, RpcError> {
		let policy = ExponentialBackoff {
			max_elapsed_time: Some(Duration::from_secs(20)),
			..ExponentialBackoff::default()
		};

		backoff::future::retry(policy, || async {
			self.request_once(method, params.clone())
				.await
				.map_err(|e| match e {
					RpcError::Unavailable(_) => backoff::Error::transient(e),
					other => backoff::Error::permanent(other),
				})
		})
		.await
	}

	async fn request_once(
		&self,
		method: &str,
		params: serde_json::Value,
	) -> Result<serde_json::Value, RpcError> {
		debug!("Calling {} on {}", method, self.rpc_url);

		let request_body = json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params,
		});

		let mut request = self.http_client.post(&self.rpc_url).json(&request_body);
		if let Some(token) = &self.token {
			request = request.bearer_auth(token);
		}

		let response = request.send().await?;

		if !response.status().is_success() {
			return Err(RpcError::Unavailable(format!(
				"HTTP error from {}: {}",
				method,
				response.status()
			)));
		}

		let response_json: serde_json::Value = response.json().await?;

		if let Some(error) = response_json.get("error") {
			let message = error
				.get("message")
				.and_then(|m| m.as_str())
				.unwrap_or("unknown error");
			if message.contains("not found") {
				return Err(RpcError::NotFound(format!("{method}: {message}")));
			}
			return Err(RpcError::Malformed(format!("{method}: {message}")));
		}

		response_json
			.get("result")
			.cloned()
			.ok_or_else(|| RpcError::Malformed(format!("{method}: response missing result")))
	}
}

#[async_trait::async_trait]
impl ChainRpc for LotusClient {
	async fn chain_head(&self) -> Result<u64, RpcError> {
		let result = self.request("Filecoin.ChainHead", json!([])).await?;
		let head: ChainHead = serde_json::from_value(result)?;
		Ok(head.height)
	}

	async fn list_messages_to(
		&self,
		address: &str,
		since_height: u64,
	) -> Result<Vec<Cid>, RpcError> {
		let matcher = MessageMatch::to_recipient(address);
		// An empty tipset key means "from the current head".
		let result = self
			.request(
				"Filecoin.StateListMessages",
				json!([matcher, [], since_height]),
			)
			.await?;

		// The node returns null when no messages match.
		if result.is_null() {
			return Ok(Vec::new());
		}

		Ok(serde_json::from_value(result)?)
	}

	async fn get_message(&self, cid: &Cid) -> Result<MessageDetail, RpcError> {
		let result = self.request("Filecoin.ChainGetMessage", json!([cid])).await?;
		Ok(serde_json::from_value(result)?)
	}
}
