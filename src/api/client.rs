//! HTTP client for the Diadem backend API.
//!
//! The backend is a plain JSON-over-HTTP service: existence checks are GET
//! requests, every write is a POST acknowledged with a 2xx status. The
//! [`BackendApi`] trait is the seam the orchestration layer depends on; the
//! reqwest-backed [`HttpBackendClient`] is the production implementation.
//! Every request carries the client-level timeout, the original transport
//! had none.

use super::types::*;
use crate::state::UserSummary;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Backend operation surface consumed by the orchestration layer.
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
	/// Whether an account exists for this identity.
	async fn check_user(&self, user: &str) -> Result<bool, ApiError>;

	/// Whether the backend recognizes this identity-to-address binding.
	async fn check_user_address(
		&self,
		user: &str,
		wallet_address: &str,
	) -> Result<bool, ApiError>;

	async fn register_user(&self, request: &RegisterUserRequest) -> Result<(), ApiError>;

	async fn confirm_achievement(
		&self,
		request: &ConfirmAchievementRequest,
	) -> Result<(), ApiError>;

	async fn create_achievement(&self, request: &AchievementWriteRequest)
	-> Result<(), ApiError>;

	async fn update_achievement(&self, request: &AchievementWriteRequest)
	-> Result<(), ApiError>;

	/// Ask the backend to encode a deposit target for an escrowed payment.
	async fn encode_deposit(&self, link: &str, witness: &str)
	-> Result<EncodedDeposit, ApiError>;

	/// Record a raw funded deposit transaction pending witness confirmation.
	async fn record_deposit(&self, request: &DepositRecordRequest) -> Result<(), ApiError>;

	async fn fetch_users(&self) -> Result<Vec<UserSummary>, ApiError>;

	/// List unconfirmed transactions for an address via the explorer.
	async fn pending_transactions(&self, address: &str) -> Result<Vec<String>, ApiError>;
}

/// Diadem backend HTTP client
#[derive(Clone)]
pub struct HttpBackendClient {
	http_client: Client,
	/// Base URL of the backend REST endpoint.
	base_url: String,
	/// Base URL of the transaction explorer.
	explorer_url: String,
}

impl HttpBackendClient {
	pub fn new(base_url: String, explorer_url: String) -> Result<Self, ApiError> {
		let http_client = Client::builder()
			.timeout(Duration::from_secs(30))
			.build()?;

		Ok(Self {
			http_client,
			base_url,
			explorer_url,
		})
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url.trim_end_matches('/'), path)
	}

	async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
		debug!("GET {}", url);
		let response = self.http_client.get(url).send().await?;
		if !response.status().is_success() {
			return Err(ApiError::Backend(format!(
				"HTTP {} from {}",
				response.status(),
				url
			)));
		}
		Ok(response.json().await?)
	}

	async fn post_json<B: Serialize, T: DeserializeOwned>(
		&self,
		url: &str,
		body: &B,
	) -> Result<T, ApiError> {
		debug!("POST {}", url);
		let response = self.http_client.post(url).json(body).send().await?;
		if !response.status().is_success() {
			return Err(ApiError::Backend(format!(
				"HTTP {} from {}",
				response.status(),
				url
			)));
		}
		Ok(response.json().await?)
	}

	async fn post_ack<B: Serialize>(&self, url: &str, body: &B) -> Result<(), ApiError> {
		debug!("POST {}", url);
		let response = self.http_client.post(url).json(body).send().await?;
		if !response.status().is_success() {
			return Err(ApiError::Backend(format!(
				"HTTP {} from {}",
				response.status(),
				url
			)));
		}
		Ok(())
	}
}

#[async_trait::async_trait]
impl BackendApi for HttpBackendClient {
	async fn check_user(&self, user: &str) -> Result<bool, ApiError> {
		let reply: ExistsResponse = self
			.get_json(&self.url(&format!("users/{}/exists", user)))
			.await?;
		Ok(reply.exists)
	}

	async fn check_user_address(
		&self,
		user: &str,
		wallet_address: &str,
	) -> Result<bool, ApiError> {
		let reply: ExistsResponse = self
			.get_json(&self.url(&format!(
				"users/{}/addresses/{}/exists",
				user, wallet_address
			)))
			.await?;
		Ok(reply.exists)
	}

	async fn register_user(&self, request: &RegisterUserRequest) -> Result<(), ApiError> {
		self.post_ack(&self.url("users/register"), request).await
	}

	async fn confirm_achievement(
		&self,
		request: &ConfirmAchievementRequest,
	) -> Result<(), ApiError> {
		self.post_ack(&self.url("achievements/confirm"), request)
			.await
	}

	async fn create_achievement(
		&self,
		request: &AchievementWriteRequest,
	) -> Result<(), ApiError> {
		self.post_ack(&self.url("achievements/create"), request)
			.await
	}

	async fn update_achievement(
		&self,
		request: &AchievementWriteRequest,
	) -> Result<(), ApiError> {
		self.post_ack(&self.url("achievements/update"), request)
			.await
	}

	async fn encode_deposit(
		&self,
		link: &str,
		witness: &str,
	) -> Result<EncodedDeposit, ApiError> {
		let body = serde_json::json!({ "link": link, "witness": witness });
		self.post_json(&self.url("deposits/encode"), &body).await
	}

	async fn record_deposit(&self, request: &DepositRecordRequest) -> Result<(), ApiError> {
		self.post_ack(&self.url("deposits"), request).await
	}

	async fn fetch_users(&self) -> Result<Vec<UserSummary>, ApiError> {
		let reply: UsersResponse = self.get_json(&self.url("users")).await?;
		Ok(reply.users_list)
	}

	async fn pending_transactions(&self, address: &str) -> Result<Vec<String>, ApiError> {
		let url = format!(
			"{}/transactions/{}",
			self.explorer_url.trim_end_matches('/'),
			address
		);
		self.get_json(&url).await
	}
}
