//! Address prefix normalization between network variants.
//!
//! Testnet nodes report mainnet-style `f`-prefixed addresses over the RPC,
//! so recipients and senders are rewritten to the configured network's
//! prefix before anything is recorded. The mapping is an explicit table so
//! the rewrite can be tested independently of the fetch path.

use super::types::FilecoinNetwork;

/// Address prefix for each network variant.
const NETWORK_PREFIXES: [(FilecoinNetwork, char); 2] = [
	(FilecoinNetwork::Mainnet, 'f'),
	(FilecoinNetwork::Testnet, 't'),
];

/// The address prefix used by `network`.
pub fn network_prefix(network: FilecoinNetwork) -> char {
	NETWORK_PREFIXES
		.iter()
		.find(|(n, _)| *n == network)
		.map(|(_, prefix)| *prefix)
		.expect("every network variant has a prefix entry")
}

/// Rewrite an address carrying another network variant's prefix to the
/// configured network's prefix. Addresses already carrying the right prefix,
/// or not starting with any known prefix, are returned unchanged.
pub fn normalize_address(network: FilecoinNetwork, address: &str) -> String {
	let target = network_prefix(network);
	let mut chars = address.chars();
	match chars.next() {
		Some(first)
			if first != target && NETWORK_PREFIXES.iter().any(|(_, p)| *p == first) =>
		{
			format!("{}{}", target, chars.as_str())
		}
		_ => address.to_string(),
	}
}
