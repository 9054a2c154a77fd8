//! Environment-driven bootstrap configuration.
//!
//! Endpoints, tokens, the data directory, and the watched address sets all
//! come from the environment with production defaults baked in. Watched
//! addresses are static configuration as far as the sync core is concerned;
//! the core never mutates the set.

use crate::indexer::FilecoinNetwork;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_MAINNET_RPC_URL: &str = "https://api.node.glif.io/rpc/v0";
const DEFAULT_TESTNET_RPC_URL: &str = "https://api.calibration.node.glif.io/rpc/v0";
const DEFAULT_DATA_DIR: &str = "./data";

/// Addresses watched by default on each network.
fn default_watched_addresses(network: FilecoinNetwork) -> Vec<String> {
	match network {
		FilecoinNetwork::Mainnet => {
			vec!["f15wjyn36z6x5ypq7f73yaolqbxyiiwkg5mmuyo2q".to_string()]
		}
		FilecoinNetwork::Testnet => vec![
			"t1v2ftlxhedyoijv7uqgxfygiziaqz23lgkvks77i".to_string(),
			"t1cfxqaivmpcv2rxdd2ew75u5duyabpkri2f6lddy".to_string(),
		],
	}
}

/// Split a comma-separated address list, dropping empty entries.
pub(crate) fn parse_address_list(raw: &str) -> Vec<String> {
	raw.split(',')
		.map(|address| address.trim().to_string())
		.filter(|address| !address.is_empty())
		.collect()
}

/// Per-network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
	pub network: FilecoinNetwork,
	pub rpc_url: String,
	pub rpc_token: Option<String>,
	pub watched_addresses: Vec<String>,
}

impl NetworkConfig {
	fn from_env(network: FilecoinNetwork) -> Self {
		let (url_var, token_var, addresses_var, default_url) = match network {
			FilecoinNetwork::Mainnet => (
				"FILECOIN_MAINNET_URL",
				"FILECOIN_MAINNET_TOKEN",
				"WATCHED_ADDRESSES_MAINNET",
				DEFAULT_MAINNET_RPC_URL,
			),
			FilecoinNetwork::Testnet => (
				"FILECOIN_TESTNET_URL",
				"FILECOIN_TESTNET_TOKEN",
				"WATCHED_ADDRESSES_TESTNET",
				DEFAULT_TESTNET_RPC_URL,
			),
		};

		let watched_addresses = env::var(addresses_var)
			.map(|raw| parse_address_list(&raw))
			.unwrap_or_else(|_| default_watched_addresses(network));

		Self {
			network,
			rpc_url: env::var(url_var).unwrap_or_else(|_| default_url.to_string()),
			rpc_token: env::var(token_var).ok(),
			watched_addresses,
		}
	}
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct Config {
	pub data_dir: PathBuf,
	pub poll_interval: Duration,
	pub networks: Vec<NetworkConfig>,
}

impl Config {
	pub fn from_env() -> Self {
		let data_dir = env::var("INDEXER_DATA_DIR")
			.unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
			.into();

		let poll_interval = env::var("INDEXER_POLL_INTERVAL_SECS")
			.ok()
			.and_then(|raw| raw.parse().ok())
			.map(Duration::from_secs)
			.unwrap_or(crate::indexer::service::POLL_INTERVAL);

		let networks = [FilecoinNetwork::Mainnet, FilecoinNetwork::Testnet]
			.into_iter()
			.map(NetworkConfig::from_env)
			.collect();

		Self {
			data_dir,
			poll_interval,
			networks,
		}
	}
}
