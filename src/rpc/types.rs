//! Wire types for the Lotus JSON-RPC API

use serde::{Deserialize, Serialize};
use std::fmt;

/// A content identifier as Lotus serializes it: `{"/": "bafy..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Cid {
	#[serde(rename = "/")]
	pub root: String,
}

impl Cid {
	pub fn new(root: impl Into<String>) -> Self {
		Self { root: root.into() }
	}
}

impl fmt::Display for Cid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.root)
	}
}

/// The chain head tipset, reduced to the fields this service reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChainHead {
	pub height: u64,
}

/// Full message detail from `Filecoin.ChainGetMessage`.
///
/// `Value` is a decimal attoFIL string; amounts routinely exceed `u64` so
/// they are carried as strings end to end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageDetail {
	pub to: String,
	pub from: String,
	pub value: String,
	pub nonce: u64,
	#[serde(default)]
	pub method: u64,
	#[serde(default)]
	pub params: Option<String>,
}

/// Message template passed to `Filecoin.StateListMessages` to match all
/// messages sent to a single recipient. Everything except `To` is zeroed,
/// mirroring what the node expects for a recipient-only match.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageMatch {
	pub version: u64,
	pub to: String,
	pub from: Option<String>,
	pub nonce: u64,
	pub value: String,
	pub gas_price: String,
	pub gas_limit: u64,
	pub method: u64,
	pub params: Option<String>,
}

impl MessageMatch {
	/// Match every message addressed to `recipient`.
	pub fn to_recipient(recipient: &str) -> Self {
		Self {
			version: 0,
			to: recipient.to_string(),
			from: None,
			nonce: 0,
			value: "0".to_string(),
			gas_price: "0".to_string(),
			gas_limit: 0,
			method: 0,
			params: None,
		}
	}
}

/// Errors surfaced by the chain RPC collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
	/// Transport failure or timeout; retried by the poll loop.
	#[error("chain rpc unavailable: {0}")]
	Unavailable(String),

	/// The node does not know the requested record.
	#[error("chain rpc record not found: {0}")]
	NotFound(String),

	/// The node answered with an error payload or an unparseable body.
	#[error("malformed chain rpc response: {0}")]
	Malformed(String),
}

impl From<reqwest::Error> for RpcError {
	fn from(err: reqwest::Error) -> Self {
		RpcError::Unavailable(err.to_string())
	}
}

impl From<serde_json::Error> for RpcError {
	fn from(err: serde_json::Error) -> Self {
		RpcError::Malformed(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cid_roundtrips_through_lotus_encoding() {
		let json = r#"{"/":"bafy2bzacebhc5rzrtquqjghkgpob6hxgsbz4iqzx73erjj3tu53zgsa62uoy6"}"#;
		let cid: Cid = serde_json::from_str(json).unwrap();
		assert_eq!(
			cid.root,
			"bafy2bzacebhc5rzrtquqjghkgpob6hxgsbz4iqzx73erjj3tu53zgsa62uoy6"
		);
		assert_eq!(serde_json::to_string(&cid).unwrap(), json);
	}

	#[test]
	fn message_detail_parses_node_response() {
		let json = r#"{
			"Version": 0,
			"To": "f15wjyn36z6x5ypq7f73yaolqbxyiiwkg5mmuyo2q",
			"From": "f12e32a3szzf6zsl6d3s5lnal6heypkzlb5nizvrq",
			"Nonce": 1,
			"Value": "795400000000000000000",
			"GasLimit": 609960,
			"GasFeeCap": "101737",
			"GasPremium": "100683",
			"Method": 0,
			"Params": "b1o1UTNEV0FjSXZEZWpjMzF6UlRXUGNrdk1ZdTg5YW9tUEpyUVZZOUpaZw=="
		}"#;
		let detail: MessageDetail = serde_json::from_str(json).unwrap();
		assert_eq!(detail.to, "f15wjyn36z6x5ypq7f73yaolqbxyiiwkg5mmuyo2q");
		assert_eq!(detail.value, "795400000000000000000");
		assert_eq!(detail.nonce, 1);
		assert!(detail.params.is_some());
	}

	#[test]
	fn message_match_serializes_with_node_field_names() {
		let matcher = MessageMatch::to_recipient("f15wjyn36z6x5ypq7f73yaolqbxyiiwkg5mmuyo2q");
		let value = serde_json::to_value(&matcher).unwrap();
		assert_eq!(value["To"], "f15wjyn36z6x5ypq7f73yaolqbxyiiwkg5mmuyo2q");
		assert_eq!(value["From"], serde_json::Value::Null);
		assert_eq!(value["Value"], "0");
		assert_eq!(value["GasPrice"], "0");
		assert_eq!(value["Method"], 0);
	}
}
