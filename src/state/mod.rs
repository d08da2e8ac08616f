//! Application state store.
//!
//! Holds the `session`, `wallet`, `achievements`, `transactions`, `users`
//! and `ui` slices read and written by the orchestration layer. The store
//! is only ever mutated through discrete [`StateCommand`] writes applied by
//! [`AppState::apply`]; a command replaces a slice's data, patches its meta
//! or moves its status, never partially mutates it in place.

use serde::{Deserialize, Serialize};

/// Identity supplied by the third-party login provider. Immutable for the
/// lifetime of a session, replaced wholesale on re-login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
	pub access_token: String,
	pub name: String,
	#[serde(rename = "userID")]
	pub user_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
	#[default]
	Unauthenticated,
	Succeeded,
}

/// Lifecycle status of the session wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalletStatus {
	#[default]
	Uninitialized,
	NeedsRecovering,
	Generated,
	Restored,
	RecoverFailed,
	Error,
}

/// Network-derived wallet data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletData {
	pub address: String,
	pub account_id: Option<String>,
	pub balance: u128,
	pub transactions: Vec<String>,
}

/// Locally held wallet metadata. The private key lives here and in the
/// keystore only; it is never sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WalletMeta {
	pub private_key: Option<String>,
	pub mnemonic: Option<String>,
	pub is_registration_pending: bool,
	pub is_user_registered: bool,
	pub has_pending_transactions: bool,
}

/// Partial update to [`WalletMeta`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct WalletMetaPatch {
	pub private_key: Option<String>,
	pub mnemonic: Option<String>,
	pub is_registration_pending: Option<bool>,
	pub is_user_registered: Option<bool>,
	pub has_pending_transactions: Option<bool>,
}

/// An achievement claim tied to one wallet address. `previous_link` is
/// empty on creation and names the superseded version on update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
	pub address: String,
	pub link: String,
	pub title: String,
	#[serde(default)]
	pub previous_link: String,
	pub name: String,
	pub user: String,
	#[serde(default)]
	pub token: String,
}

/// Summary of a registered user, as returned by the backend user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
	pub user: String,
	pub name: String,
	pub address: String,
}

/// Phase of a one-shot network-backed write operation. Operations are
/// never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AsyncPhase {
	#[default]
	Idle,
	Requested,
	Succeeded,
	Failed(String),
}

/// The achievement write operations tracked with a phase each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementOp {
	Confirm,
	Create,
	Update,
	Support,
	Deposit,
}

#[derive(Debug, Clone, Default)]
pub struct SessionSlice {
	pub identity: Option<SessionIdentity>,
	pub auth_status: AuthStatus,
}

#[derive(Debug, Clone, Default)]
pub struct WalletSlice {
	pub data: WalletData,
	pub meta: WalletMeta,
	pub status: WalletStatus,
}

#[derive(Debug, Clone, Default)]
pub struct AchievementsSlice {
	pub data: Vec<Achievement>,
	pub confirm: AsyncPhase,
	pub create: AsyncPhase,
	pub update: AsyncPhase,
	pub support: AsyncPhase,
	pub deposit: AsyncPhase,
}

impl AchievementsSlice {
	pub fn phase(&self, op: AchievementOp) -> &AsyncPhase {
		match op {
			AchievementOp::Confirm => &self.confirm,
			AchievementOp::Create => &self.create,
			AchievementOp::Update => &self.update,
			AchievementOp::Support => &self.support,
			AchievementOp::Deposit => &self.deposit,
		}
	}

	fn phase_mut(&mut self, op: AchievementOp) -> &mut AsyncPhase {
		match op {
			AchievementOp::Confirm => &mut self.confirm,
			AchievementOp::Create => &mut self.create,
			AchievementOp::Update => &mut self.update,
			AchievementOp::Support => &mut self.support,
			AchievementOp::Deposit => &mut self.deposit,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct TransactionsSlice {
	pub data: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UiSlice {
	pub show_help: bool,
}

/// A discrete, complete write to one slice of the store.
#[derive(Debug, Clone)]
pub enum StateCommand {
	SetIdentity(SessionIdentity),
	SetAuthStatus(AuthStatus),
	SetWalletData(WalletData),
	PatchWalletMeta(WalletMetaPatch),
	SetWalletStatus(WalletStatus),
	SetAchievements(Vec<Achievement>),
	SetAchievementPhase(AchievementOp, AsyncPhase),
	SetTransactions(Vec<String>),
	SetUsers(Vec<UserSummary>),
	SetShowHelp(bool),
}

/// The whole application state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
	pub session: SessionSlice,
	pub wallet: WalletSlice,
	pub achievements: AchievementsSlice,
	pub transactions: TransactionsSlice,
	pub users: Vec<UserSummary>,
	pub ui: UiSlice,
}

impl AppState {
	pub fn apply(&mut self, command: StateCommand) {
		match command {
			StateCommand::SetIdentity(identity) => {
				self.session.identity = Some(identity);
			}
			StateCommand::SetAuthStatus(status) => {
				self.session.auth_status = status;
			}
			StateCommand::SetWalletData(data) => {
				self.wallet.data = data;
			}
			StateCommand::PatchWalletMeta(patch) => {
				let meta = &mut self.wallet.meta;
				if let Some(private_key) = patch.private_key {
					meta.private_key = Some(private_key);
				}
				if let Some(mnemonic) = patch.mnemonic {
					meta.mnemonic = Some(mnemonic);
				}
				if let Some(pending) = patch.is_registration_pending {
					meta.is_registration_pending = pending;
				}
				if let Some(registered) = patch.is_user_registered {
					meta.is_user_registered = registered;
				}
				if let Some(has_pending) = patch.has_pending_transactions {
					meta.has_pending_transactions = has_pending;
				}
			}
			StateCommand::SetWalletStatus(status) => {
				self.wallet.status = status;
			}
			StateCommand::SetAchievements(data) => {
				self.achievements.data = data;
			}
			StateCommand::SetAchievementPhase(op, phase) => {
				*self.achievements.phase_mut(op) = phase;
			}
			StateCommand::SetTransactions(data) => {
				self.transactions.data = data;
			}
			StateCommand::SetUsers(users) => {
				self.users = users;
			}
			StateCommand::SetShowHelp(show) => {
				self.ui.show_help = show;
			}
		}
	}
}
