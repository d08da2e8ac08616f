//! Login orchestration and wallet lifecycle.
//!
//! Reacts to a successful third-party login by branching between
//! registration (new identity) and wallet load (returning identity), and
//! implements recovery from a user-supplied secret. Every load and every
//! recovery passes through [`Orchestrator::verify_address_binding`]: a
//! wallet whose address the backend does not attribute to the current
//! identity is never committed to state.

use super::error::ActionError;
use super::Orchestrator;
use crate::api::RegisterUserRequest;
use crate::chain::keys::{self, KeyMaterial};
use crate::chain::{user_id_from_address, wallet_address_for};
use crate::notify::Notice;
use crate::state::{
	AuthStatus, SessionIdentity, StateCommand, WalletData, WalletMetaPatch, WalletStatus,
};
use tracing::{error, info, warn};

/// Secret supplied for wallet recovery. Exactly one of the two fields
/// must be set.
#[derive(Debug, Clone, Default)]
pub struct RecoverInput {
	pub mnemonic: Option<String>,
	pub private_key: Option<String>,
}

impl Orchestrator {
	/// Handle a successful third-party login: commit the identity, then
	/// route to registration or wallet load depending on whether the
	/// backend already knows this user.
	pub async fn handle_login(&mut self, identity: SessionIdentity) -> Result<(), ActionError> {
		self.apply(StateCommand::SetIdentity(identity.clone()));
		self.apply(StateCommand::SetAuthStatus(AuthStatus::Succeeded));
		self.notify(Notice::LoginSucceeded);

		match self.route_login(&identity).await {
			Ok(()) => Ok(()),
			Err(err) => {
				error!("login check failed for user {}: {}", identity.user_id, err);
				self.notify(Notice::LoginCheckFailed);
				Err(err)
			}
		}
	}

	async fn route_login(&mut self, identity: &SessionIdentity) -> Result<(), ActionError> {
		let exists = self.api().check_user(&identity.user_id).await?;
		if exists {
			info!("account exists for user {}, loading wallet", identity.user_id);
			self.apply(StateCommand::PatchWalletMeta(WalletMetaPatch {
				is_user_registered: Some(true),
				..Default::default()
			}));
			// load reports its own failures; they are not login-check errors
			let user_id = identity.user_id.clone();
			let _ = self.load_wallet(&user_id).await;
			Ok(())
		} else {
			info!("no account for user {}, registering", identity.user_id);
			self.register_user(identity).await
		}
	}

	/// Establish a wallet for the identity from locally persisted key
	/// material. Idempotent: a second call with the same keystore and
	/// backend state lands in the same status and address.
	pub async fn load_wallet(&mut self, user_id: &str) -> Result<(), ActionError> {
		match self.load_wallet_inner(user_id).await {
			Ok(()) => Ok(()),
			Err(err) => {
				error!("wallet load failed for user {}: {}", user_id, err);
				self.notify(Notice::WalletLoadFailed);
				self.apply(StateCommand::SetWalletStatus(WalletStatus::Error));
				Err(err)
			}
		}
	}

	async fn load_wallet_inner(&mut self, user_id: &str) -> Result<(), ActionError> {
		let stored = self.keystore().load_private_key(user_id).await?;
		let Some(wif) = stored else {
			info!("no persisted key for user {}", user_id);
			self.apply(StateCommand::SetWalletStatus(WalletStatus::NeedsRecovering));
			return Ok(());
		};

		let key = KeyMaterial::from_wif(&wif)?;
		let wallet_data = self.fetch_wallet_info(user_id).await?;
		self.verify_address_binding(wallet_data, &key, user_id).await
	}

	/// Recover the wallet from a user-supplied secret. The exactly-one
	/// input rule is enforced before any keystore or network access.
	pub async fn recover_wallet(&mut self, input: RecoverInput) -> Result<(), ActionError> {
		let key = match (&input.mnemonic, &input.private_key) {
			(Some(_), Some(_)) | (None, None) => {
				warn!("recovery rejected: expected exactly one secret input");
				self.notify(Notice::RecoverInputInvalid);
				return Err(ActionError::InvalidRecoveryInput);
			}
			(Some(phrase), None) => KeyMaterial::from_brain_key(phrase),
			(None, Some(wif)) => match KeyMaterial::from_wif(wif) {
				Ok(key) => key,
				Err(err) => {
					warn!("recovery rejected: {}", err);
					self.notify(Notice::RecoverInputInvalid);
					return Err(err.into());
				}
			},
		};

		match self.recover_wallet_inner(key).await {
			Ok(()) => Ok(()),
			Err(err) => {
				error!("wallet recovery failed: {}", err);
				self.notify(Notice::WalletRecoverFailed);
				Err(err)
			}
		}
	}

	async fn recover_wallet_inner(&mut self, key: KeyMaterial) -> Result<(), ActionError> {
		let identity = self.current_identity()?;
		self.keystore()
			.store_private_key(&identity.user_id, key.wif())
			.await?;
		let wallet_data = self.fetch_wallet_info(&identity.user_id).await?;
		self.verify_address_binding(wallet_data, &key, &identity.user_id)
			.await
	}

	/// Generate a fresh wallet for a new identity and register it with
	/// the backend. Failures surface through the caller's login boundary.
	pub(crate) async fn register_user(
		&mut self,
		identity: &SessionIdentity,
	) -> Result<(), ActionError> {
		let mnemonic = keys::suggest_brain_key();
		let key = KeyMaterial::from_brain_key(&mnemonic);

		self.keystore()
			.store_private_key(&identity.user_id, key.wif())
			.await?;
		self.apply(StateCommand::PatchWalletMeta(WalletMetaPatch {
			mnemonic: Some(mnemonic),
			private_key: Some(key.wif().to_string()),
			is_registration_pending: Some(true),
			..Default::default()
		}));

		let address = wallet_address_for(&identity.user_id);
		self.api()
			.register_user(&RegisterUserRequest {
				public_key: key.public_key().to_string(),
				address: address.clone(),
				name: identity.name.clone(),
				user: identity.user_id.clone(),
				token: identity.access_token.clone(),
			})
			.await?;

		self.apply(StateCommand::SetWalletData(WalletData {
			address,
			..Default::default()
		}));
		self.apply(StateCommand::SetWalletStatus(WalletStatus::Generated));
		self.notify(Notice::WalletGenerated);
		Ok(())
	}

	/// Confirm a registration the backend finished processing, then load
	/// the wallet.
	pub async fn confirm_registration(&mut self) -> Result<(), ActionError> {
		let identity = match self.current_identity() {
			Ok(identity) => identity,
			Err(err) => {
				self.notify(Notice::LoginCheckFailed);
				return Err(err);
			}
		};

		self.apply(StateCommand::PatchWalletMeta(WalletMetaPatch {
			is_registration_pending: Some(false),
			is_user_registered: Some(true),
			..Default::default()
		}));
		self.notify(Notice::UserRegistrationConfirmed);
		self.load_wallet(&identity.user_id).await
	}

	/// Gate between a fetched wallet and the state store: the backend
	/// must attribute the address to this identity, otherwise nothing is
	/// committed and the status moves to `RecoverFailed`.
	pub(crate) async fn verify_address_binding(
		&mut self,
		wallet_data: WalletData,
		key: &KeyMaterial,
		user_id: &str,
	) -> Result<(), ActionError> {
		// local invariant first: the address must derive from this session
		if wallet_data.address != wallet_address_for(user_id) {
			self.apply(StateCommand::SetWalletStatus(WalletStatus::RecoverFailed));
			return Err(ActionError::AddressMismatch {
				address: wallet_data.address,
				user_id: user_id.to_string(),
			});
		}

		let exists = self
			.api()
			.check_user_address(user_id, &wallet_data.address)
			.await?;
		if exists {
			self.apply(StateCommand::SetWalletData(wallet_data));
			self.apply(StateCommand::PatchWalletMeta(WalletMetaPatch {
				private_key: Some(key.wif().to_string()),
				..Default::default()
			}));
			self.notify(Notice::WalletRestored);
			self.apply(StateCommand::SetWalletStatus(WalletStatus::Restored));
		} else {
			warn!("address binding rejected for user {}", user_id);
			self.apply(StateCommand::SetWalletStatus(WalletStatus::RecoverFailed));
		}
		Ok(())
	}

	/// Re-fetch account and balance for a committed wallet, writing state
	/// only when something changed.
	pub async fn refresh_wallet(&mut self, address: &str) -> Result<(), ActionError> {
		let Some(user_id) = user_id_from_address(address).map(str::to_string) else {
			self.notify(Notice::WalletRefreshFailed);
			return Err(ActionError::WalletUnavailable);
		};

		match self.fetch_wallet_info(&user_id).await {
			Ok(wallet_data) => {
				if wallet_data != self.state.wallet.data {
					self.apply(StateCommand::SetWalletData(wallet_data));
				}
				Ok(())
			}
			Err(err) => {
				error!("wallet refresh failed for {}: {}", address, err);
				self.notify(Notice::WalletRefreshFailed);
				Err(err)
			}
		}
	}

	/// Fetch address, account and balance for an identity from the chain.
	async fn fetch_wallet_info(&self, user_id: &str) -> Result<WalletData, ActionError> {
		let address = wallet_address_for(user_id);
		let account = self.chain().account_by_name(&address).await?;
		let balance = self.chain().balance(&account.id).await?;
		Ok(WalletData {
			address,
			account_id: Some(account.id),
			balance,
			transactions: Vec::new(),
		})
	}
}
