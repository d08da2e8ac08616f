//! Wire types for the Diadem backend REST API.

use crate::state::UserSummary;
use serde::{Deserialize, Serialize};

/// Error types for backend API operations
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error("HTTP error: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("backend error: {0}")]
	Backend(String),

	#[error("JSON parse error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Existence check reply, shared by the user and address-binding checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistsResponse {
	pub exists: bool,
}

/// Registration of a fresh identity-to-address binding. The public key is
/// registered with the backend; the private key never leaves the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
	pub public_key: String,
	pub address: String,
	pub name: String,
	pub user: String,
	pub token: String,
}

/// Witness confirmation of an existing achievement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmAchievementRequest {
	pub address: String,
	pub link: String,
	pub token: String,
	pub user: String,
	pub wallet: String,
	pub name: String,
}

/// Creation or update of an achievement. `previous_link` is empty on
/// creation and names the superseded version on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementWriteRequest {
	pub address: String,
	pub link: String,
	pub name: String,
	pub previous_link: String,
	pub title: String,
	pub token: String,
	pub user: String,
}

/// Opaque deposit target produced by the backend for an escrowed payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedDeposit {
	pub address: String,
	pub encoded_data: String,
}

/// A raw funded transaction handed to the backend for recording. The
/// backend broadcasts it, or holds it until the witness confirms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecordRequest {
	pub address: String,
	pub link: String,
	pub raw_tx: String,
	pub token: String,
	pub user: String,
	pub witness: String,
	pub witness_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
	pub users_list: Vec<UserSummary>,
}
