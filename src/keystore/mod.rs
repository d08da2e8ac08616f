//! Local persistent storage for key material and user preferences.
//!
//! One serialized private key is kept per identity, keyed by the durable
//! user ID, alongside a single flag recording that the user dismissed the
//! introductory help dialog. The [`Keystore`] trait abstracts the storage
//! so the orchestration layer can be tested against an in-memory double;
//! [`FileKeystore`] is the file-backed production implementation.

use std::path::PathBuf;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum KeystoreError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Repository for locally persisted key material and preferences.
#[async_trait::async_trait]
pub trait Keystore: Send + Sync {
	/// Load the serialized private key for an identity, if one is stored.
	async fn load_private_key(&self, user_id: &str) -> Result<Option<String>, KeystoreError>;

	/// Persist the serialized private key for an identity. Last writer wins.
	async fn store_private_key(&self, user_id: &str, wif: &str) -> Result<(), KeystoreError>;

	/// Remove the stored key for an identity.
	async fn clear_private_key(&self, user_id: &str) -> Result<(), KeystoreError>;

	async fn help_dismissed(&self) -> Result<bool, KeystoreError>;

	async fn set_help_dismissed(&self, dismissed: bool) -> Result<(), KeystoreError>;
}

/// File-based implementation of [`Keystore`]
pub struct FileKeystore {
	data_dir: PathBuf,
}

impl FileKeystore {
	pub fn new(data_dir: PathBuf) -> Self {
		Self { data_dir }
	}

	fn key_filename(&self, user_id: &str) -> PathBuf {
		self.data_dir.join(format!("private_key_{}.wif", user_id))
	}

	fn key_metadata_filename(&self, user_id: &str) -> PathBuf {
		self.data_dir
			.join(format!("private_key_{}.meta.json", user_id))
	}

	fn help_flag_filename(&self) -> PathBuf {
		self.data_dir.join("help_dismissed")
	}
}

#[async_trait::async_trait]
impl Keystore for FileKeystore {
	async fn load_private_key(&self, user_id: &str) -> Result<Option<String>, KeystoreError> {
		let filename = self.key_filename(user_id);
		if !filename.exists() {
			return Ok(None);
		}

		let contents = tokio::fs::read_to_string(&filename).await?;
		Ok(Some(contents.trim().to_string()))
	}

	async fn store_private_key(&self, user_id: &str, wif: &str) -> Result<(), KeystoreError> {
		tokio::fs::create_dir_all(&self.data_dir).await?;

		let metadata = serde_json::json!({
			"user": user_id,
			"created_at": chrono::Utc::now().to_rfc3339(),
		});
		tokio::fs::write(
			self.key_metadata_filename(user_id),
			serde_json::to_string_pretty(&metadata).unwrap_or_default(),
		)
		.await?;

		let filename = self.key_filename(user_id);
		tokio::fs::write(&filename, wif).await?;

		info!("Stored private key entry at {:?}", filename);
		Ok(())
	}

	async fn clear_private_key(&self, user_id: &str) -> Result<(), KeystoreError> {
		let filename = self.key_filename(user_id);
		if filename.exists() {
			tokio::fs::remove_file(&filename).await?;
			info!("Cleared private key entry at {:?}", filename);
		}
		let metadata_filename = self.key_metadata_filename(user_id);
		if metadata_filename.exists() {
			tokio::fs::remove_file(&metadata_filename).await?;
		}
		Ok(())
	}

	async fn help_dismissed(&self) -> Result<bool, KeystoreError> {
		Ok(self.help_flag_filename().exists())
	}

	async fn set_help_dismissed(&self, dismissed: bool) -> Result<(), KeystoreError> {
		let flag = self.help_flag_filename();
		if dismissed {
			tokio::fs::create_dir_all(&self.data_dir).await?;
			tokio::fs::write(&flag, b"1").await?;
		} else if flag.exists() {
			tokio::fs::remove_file(&flag).await?;
		}
		Ok(())
	}
}
