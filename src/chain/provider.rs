//! JSON-RPC client for a Diadem chain node.
//!
//! The node exposes account lookup, balance queries, signed transfers and
//! raw funded-transaction construction. The orchestration layer only sees
//! the [`ChainProvider`] trait; transaction serialization and signing
//! mechanics stay behind the node boundary.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Error types for chain provider operations
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
	#[error("HTTP error: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("node error: {0}")]
	Rpc(String),

	#[error("JSON parse error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("account not found: {0}")]
	AccountNotFound(String),
}

/// An on-chain account resolved by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAccount {
	pub id: String,
	pub name: String,
}

/// A raw funded transaction built by the node but not broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction(pub String);

/// Chain capability surface consumed by the orchestration layer.
#[async_trait::async_trait]
pub trait ChainProvider: Send + Sync {
	async fn account_by_name(&self, name: &str) -> Result<ChainAccount, ChainError>;

	async fn balance(&self, account_id: &str) -> Result<u128, ChainError>;

	/// Execute a signed transfer between two accounts, in base units.
	async fn transfer(
		&self,
		from: &str,
		to: &str,
		amount: u128,
		signing_key_wif: &str,
	) -> Result<(), ChainError>;

	/// Build a raw funded transaction against an encoded deposit target.
	/// The transaction is returned for the backend to hold or broadcast;
	/// this call must not submit it to the network.
	async fn build_contract_send(
		&self,
		target_address: &str,
		encoded_data: &str,
		amount: u128,
		fee_rate: u64,
		signing_key_wif: &str,
	) -> Result<RawTransaction, ChainError>;
}

/// JSON-RPC backed chain provider
#[derive(Clone)]
pub struct NodeChainProvider {
	http_client: reqwest::Client,
	node_url: String,
}

impl NodeChainProvider {
	pub fn new(node_url: String) -> Result<Self, ChainError> {
		let http_client = reqwest::Client::builder()
			.timeout(Duration::from_secs(30))
			.build()?;

		Ok(Self {
			http_client,
			node_url,
		})
	}

	/// Execute a JSON-RPC call against the node.
	async fn call(
		&self,
		method: &str,
		params: serde_json::Value,
	) -> Result<serde_json::Value, ChainError> {
		debug!("chain rpc: {}", method);
		let request_body = json!({
			"method": method,
			"params": params,
		});

		let response = self
			.http_client
			.post(&self.node_url)
			.json(&request_body)
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(ChainError::Rpc(format!("HTTP {}", response.status())));
		}

		let reply: serde_json::Value = response.json().await?;
		if let Some(error) = reply.get("error") {
			return Err(ChainError::Rpc(error.to_string()));
		}

		reply
			.get("result")
			.cloned()
			.ok_or_else(|| ChainError::Rpc("reply missing result field".to_string()))
	}
}

#[async_trait::async_trait]
impl ChainProvider for NodeChainProvider {
	async fn account_by_name(&self, name: &str) -> Result<ChainAccount, ChainError> {
		let result = self
			.call("get_account_by_name", json!({ "name": name }))
			.await?;
		if result.is_null() {
			return Err(ChainError::AccountNotFound(name.to_string()));
		}
		Ok(serde_json::from_value(result)?)
	}

	async fn balance(&self, account_id: &str) -> Result<u128, ChainError> {
		let result = self
			.call("get_account_balance", json!({ "account": account_id }))
			.await?;
		let amount = result
			.get("amount")
			.and_then(|a| a.as_str())
			.ok_or_else(|| ChainError::Rpc("balance reply missing amount".to_string()))?;
		amount
			.parse()
			.map_err(|_| ChainError::Rpc(format!("unparseable balance amount: {}", amount)))
	}

	async fn transfer(
		&self,
		from: &str,
		to: &str,
		amount: u128,
		signing_key_wif: &str,
	) -> Result<(), ChainError> {
		self.call(
			"transfer",
			json!({
				"from": from,
				"to": to,
				"amount": amount.to_string(),
				"key": signing_key_wif,
			}),
		)
		.await?;
		Ok(())
	}

	async fn build_contract_send(
		&self,
		target_address: &str,
		encoded_data: &str,
		amount: u128,
		fee_rate: u64,
		signing_key_wif: &str,
	) -> Result<RawTransaction, ChainError> {
		let result = self
			.call(
				"build_contract_transfer",
				json!({
					"target": target_address,
					"data": encoded_data,
					"amount": amount.to_string(),
					"feeRate": fee_rate,
					"key": signing_key_wif,
				}),
			)
			.await?;
		let raw = result
			.get("rawTx")
			.and_then(|r| r.as_str())
			.ok_or_else(|| ChainError::Rpc("build reply missing rawTx".to_string()))?;
		Ok(RawTransaction(raw.to_string()))
	}
}
