mod config;
mod explorer;
mod indexer;
mod rpc;
mod utils;

use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::explorer::{DepositExplorer, FilfoxClient};
use crate::indexer::repositories::{
	FileAssetRepository, FileSyncStateRepository, FileTransactionRepository,
};
use crate::indexer::{DepositIndexer, FilecoinNetwork};
use crate::rpc::LotusClient;

#[tokio::main(flavor = "current_thread")]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::from_default_env()
				.add_directive(tracing::Level::INFO.into()),
		)
		.with_target(false)
		.with_timer(tracing_subscriber::fmt::time::time())
		.init();

	info!("Starting Filecoin deposit indexer");

	let config = Config::from_env();

	if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
		error!("Failed to create data directory {:?}: {}", config.data_dir, e);
		return;
	}
	if let Err(e) = FileAssetRepository::seed_defaults(&config.data_dir) {
		error!("Failed to seed asset store: {}", e);
		return;
	}

	// One independent indexer task per network; they share no mutable
	// state and pace themselves.
	let mut tasks = Vec::new();
	for network_config in config.networks.clone() {
		let data_dir = config.data_dir.clone();
		let poll_interval = config.poll_interval;

		tasks.push(tokio::spawn(async move {
			let network = network_config.network;
			info!("Configuring indexer for {}", network);

			let rpc = Arc::new(LotusClient::new(
				network_config.rpc_url.clone(),
				network_config.rpc_token.clone(),
			));

			// The explorer cross-check only exists on mainnet.
			let secondary: Option<Arc<dyn DepositExplorer>> = match network {
				FilecoinNetwork::Mainnet => match FilfoxClient::new(network) {
					Ok(client) => Some(Arc::new(client)),
					Err(e) => {
						error!("Failed to construct explorer client: {}", e);
						return;
					}
				},
				FilecoinNetwork::Testnet => None,
			};

			let transactions = Arc::new(FileTransactionRepository::new(data_dir.clone(), network));
			let sync_states = Arc::new(FileSyncStateRepository::new(data_dir.clone()));
			let assets = Arc::new(FileAssetRepository::new(data_dir));

			let mut deposit_indexer = DepositIndexer::new(
				network,
				network_config.watched_addresses,
				rpc,
				secondary,
				transactions,
				sync_states,
				assets,
			)
			.with_poll_interval(poll_interval);

			deposit_indexer.run().await;
		}));
	}

	for task in tasks {
		if let Err(e) = task.await {
			error!("Indexer task terminated: {}", e);
		}
	}
}
