//! Payload types for the Filfox address-messages API

use crate::indexer::FilecoinNetwork;
use serde::Deserialize;

/// One message row from the explorer's address listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerMessage {
	pub cid: String,
	pub height: u64,
	#[serde(default)]
	pub timestamp: u64,
	pub from: String,
	pub to: String,
	pub nonce: u64,
	/// Decimal attoFIL string.
	pub value: String,
	#[serde(default)]
	pub method: Option<String>,
	/// Base64-encoded message params, empty string when absent.
	#[serde(default)]
	pub params: Option<String>,
}

/// Successful page of an address's messages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressMessages {
	pub total_count: u64,
	pub messages: Vec<ExplorerMessage>,
}

/// Error payload the explorer returns instead of a page, e.g. for invalid
/// pagination params.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerErrorPayload {
	pub status_code: u64,
	pub message: String,
	pub error: String,
}

/// An explorer response is either a message page or an error payload; the
/// two shapes share no required fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessagesResponse {
	Messages(AddressMessages),
	Error(ExplorerErrorPayload),
}

/// Errors surfaced by the explorer collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
	/// The explorer only serves mainnet; constructing a client for any
	/// other network is a configuration error.
	#[error("explorer does not support network {0}")]
	UnsupportedNetwork(FilecoinNetwork),

	/// Transport failure or timeout.
	#[error("explorer unavailable: {0}")]
	Unavailable(String),

	/// The explorer returned an error payload or an unparseable body.
	/// Callers treat this the same as `Unavailable`.
	#[error("malformed explorer response: {0}")]
	Malformed(String),
}

impl From<reqwest::Error> for ExplorerError {
	fn from(err: reqwest::Error) -> Self {
		ExplorerError::Unavailable(err.to_string())
	}
}
