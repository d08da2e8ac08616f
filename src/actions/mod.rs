//! Wallet and session orchestration layer.
//!
//! The [`Orchestrator`] owns the application state store and coordinates
//! the backend API, the chain provider and the keystore through their seam
//! traits. Each action routine runs its external calls strictly in program
//! order, writes state only through discrete commands, and translates any
//! failure into exactly one user-facing notice.
//!
//! - `session`: login handling, wallet bootstrap, recovery and the
//!   identity-to-address binding verification gate.
//! - `achievements`: achievement lifecycle calls and the value-transfer
//!   actions (support, deposit, withdraw).
//! - `guard`: the per-address in-flight slot closing the double-submit
//!   race.
//! - `error`: the orchestration error taxonomy.

pub mod achievements;
pub mod error;
pub mod guard;
pub mod session;

pub use achievements::DepositRequest;
pub use error::ActionError;
pub use guard::TransferGuard;
pub use session::RecoverInput;

use crate::api::BackendApi;
use crate::chain::ChainProvider;
use crate::keystore::Keystore;
use crate::notify::{Notice, NoticeSink};
use crate::state::{AppState, SessionIdentity, StateCommand};

/// Coordinates the backend, chain and keystore around the state store.
pub struct Orchestrator {
	api: Box<dyn BackendApi>,
	chain: Box<dyn ChainProvider>,
	keystore: Box<dyn Keystore>,
	notices: Box<dyn NoticeSink>,
	state: AppState,
	transfer_guard: TransferGuard,
}

impl Orchestrator {
	pub fn new(
		api: Box<dyn BackendApi>,
		chain: Box<dyn ChainProvider>,
		keystore: Box<dyn Keystore>,
		notices: Box<dyn NoticeSink>,
	) -> Self {
		Self {
			api,
			chain,
			keystore,
			notices,
			state: AppState::default(),
			transfer_guard: TransferGuard::new(),
		}
	}

	pub fn state(&self) -> &AppState {
		&self.state
	}

	pub(crate) fn api(&self) -> &dyn BackendApi {
		self.api.as_ref()
	}

	pub(crate) fn chain(&self) -> &dyn ChainProvider {
		self.chain.as_ref()
	}

	pub(crate) fn keystore(&self) -> &dyn Keystore {
		self.keystore.as_ref()
	}

	pub(crate) fn transfer_guard(&self) -> &TransferGuard {
		&self.transfer_guard
	}

	pub(crate) fn apply(&mut self, command: StateCommand) {
		self.state.apply(command);
	}

	pub(crate) fn notify(&self, notice: Notice) {
		self.notices.notify(notice);
	}

	/// The identity of the authenticated session.
	pub(crate) fn current_identity(&self) -> Result<SessionIdentity, ActionError> {
		self.state
			.session
			.identity
			.clone()
			.ok_or(ActionError::SessionUnavailable)
	}

	/// The committed wallet address and signing key, required by the
	/// value-transfer actions.
	pub(crate) fn wallet_signer(&self) -> Result<(String, String), ActionError> {
		let address = self.state.wallet.data.address.clone();
		if address.is_empty() {
			return Err(ActionError::WalletUnavailable);
		}
		let key = self
			.state
			.wallet
			.meta
			.private_key
			.clone()
			.ok_or(ActionError::WalletUnavailable)?;
		Ok((address, key))
	}
}
