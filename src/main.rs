mod actions;
mod api;
mod chain;
mod keystore;
mod notify;
mod state;
#[cfg(test)]
mod testing;
mod utils;

use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::actions::Orchestrator;
use crate::api::HttpBackendClient;
use crate::chain::NodeChainProvider;
use crate::keystore::FileKeystore;
use crate::notify::TracingNoticeSink;
use crate::state::SessionIdentity;
use crate::utils::{DIADEM_TOKEN_DECIMALS, format_token_amount};

fn env_or(name: &str, default: &str) -> String {
	std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::from_default_env()
				.add_directive(tracing::Level::INFO.into()),
		)
		.with_target(false)
		.init();

	info!("Starting Diadem Network client");

	let api_url = env_or("DIADEM_API_URL", "http://localhost:4000/api");
	let explorer_url = env_or("DIADEM_EXPLORER_URL", "http://localhost:4000/explorer");
	let node_url = env_or("DIADEM_NODE_URL", "http://localhost:8090/rpc");
	let data_dir = PathBuf::from(env_or("DIADEM_DATA_DIR", "./diadem-data"));

	let api = match HttpBackendClient::new(api_url, explorer_url) {
		Ok(client) => client,
		Err(e) => {
			error!("Failed to create backend client: {}", e);
			return;
		}
	};

	let chain = match NodeChainProvider::new(node_url) {
		Ok(provider) => provider,
		Err(e) => {
			error!("Failed to create chain provider: {}", e);
			return;
		}
	};

	let keystore = FileKeystore::new(data_dir);

	let mut orchestrator = Orchestrator::new(
		Box::new(api),
		Box::new(chain),
		Box::new(keystore),
		Box::new(TracingNoticeSink),
	);

	// The identity normally arrives from the login provider callback; the
	// standalone binary takes it from the environment.
	let (Ok(access_token), Ok(name), Ok(user_id)) = (
		std::env::var("DIADEM_ACCESS_TOKEN"),
		std::env::var("DIADEM_USER_NAME"),
		std::env::var("DIADEM_USER_ID"),
	) else {
		warn!(
			"Set DIADEM_ACCESS_TOKEN, DIADEM_USER_NAME and DIADEM_USER_ID to run a login flow"
		);
		return;
	};

	let identity = SessionIdentity {
		access_token,
		name,
		user_id,
	};

	if let Err(e) = orchestrator.handle_login(identity).await {
		error!("Login flow failed: {}", e);
		return;
	}

	let wallet = &orchestrator.state().wallet;
	info!(
		"Wallet {} in status {:?}, balance {} DDM",
		wallet.data.address,
		wallet.status,
		format_token_amount(wallet.data.balance, DIADEM_TOKEN_DECIMALS),
	);
}
