//! Achievement lifecycle and value-transfer actions.
//!
//! The lifecycle calls (confirm, create, update) follow one three-phase
//! pattern: mark `Requested`, call the backend with the current wallet
//! address and identity token, then mark `Succeeded` or `Failed` with the
//! matching notice. Nothing is optimistically mutated, nothing is retried.
//!
//! The value-transfer actions additionally claim the per-address in-flight
//! slot before touching the network. A deposit never broadcasts anything
//! itself: the chain provider only builds the raw funded transaction, and
//! the backend holds it until the witness confirms.

use super::error::ActionError;
use super::Orchestrator;
use crate::api::{AchievementWriteRequest, ConfirmAchievementRequest, DepositRecordRequest};
use crate::notify::Notice;
use crate::state::{Achievement, AchievementOp, AsyncPhase, StateCommand, WalletMetaPatch};
use crate::utils::to_base_units;
use tracing::{error, info};

/// Parameters of an escrowed deposit towards an achievement.
#[derive(Debug, Clone)]
pub struct DepositRequest {
	pub amount: u64,
	pub fees: u64,
	pub link: String,
	pub witness_address: String,
	pub witness_name: String,
	pub witness_user_id: String,
}

impl Orchestrator {
	/// Confirm an achievement as its designated witness.
	pub async fn confirm_achievement(
		&mut self,
		address: &str,
		link: &str,
	) -> Result<(), ActionError> {
		self.apply(StateCommand::SetAchievementPhase(
			AchievementOp::Confirm,
			AsyncPhase::Requested,
		));

		let outcome = self.confirm_achievement_inner(address, link).await;
		self.finish_phase(
			AchievementOp::Confirm,
			Notice::ConfirmAchievementSucceeded,
			Notice::ConfirmAchievementFailed,
			outcome,
		)
	}

	async fn confirm_achievement_inner(
		&mut self,
		address: &str,
		link: &str,
	) -> Result<(), ActionError> {
		let identity = self.current_identity()?;
		let (wallet, _) = self.wallet_signer()?;
		self.api()
			.confirm_achievement(&ConfirmAchievementRequest {
				address: address.to_string(),
				link: link.to_string(),
				token: identity.access_token,
				user: identity.user_id,
				wallet,
				name: identity.name,
			})
			.await?;
		Ok(())
	}

	/// Create a new achievement tied to the session wallet.
	pub async fn create_achievement(&mut self, link: &str, title: &str) -> Result<(), ActionError> {
		self.apply(StateCommand::SetAchievementPhase(
			AchievementOp::Create,
			AsyncPhase::Requested,
		));

		let outcome = self.write_achievement(link, title, "").await;
		self.finish_phase(
			AchievementOp::Create,
			Notice::CreateAchievementSucceeded,
			Notice::CreateAchievementFailed,
			outcome,
		)
	}

	/// Update an achievement, superseding the version at `previous_link`.
	pub async fn update_achievement(
		&mut self,
		link: &str,
		title: &str,
		previous_link: &str,
	) -> Result<(), ActionError> {
		self.apply(StateCommand::SetAchievementPhase(
			AchievementOp::Update,
			AsyncPhase::Requested,
		));

		let outcome = self.write_achievement(link, title, previous_link).await;
		self.finish_phase(
			AchievementOp::Update,
			Notice::UpdateAchievementSucceeded,
			Notice::UpdateAchievementFailed,
			outcome,
		)
	}

	async fn write_achievement(
		&mut self,
		link: &str,
		title: &str,
		previous_link: &str,
	) -> Result<(), ActionError> {
		let identity = self.current_identity()?;
		let (address, _) = self.wallet_signer()?;
		let request = AchievementWriteRequest {
			address,
			link: link.to_string(),
			name: identity.name,
			previous_link: previous_link.to_string(),
			title: title.to_string(),
			token: identity.access_token,
			user: identity.user_id,
		};
		if previous_link.is_empty() {
			self.api().create_achievement(&request).await?;
		} else {
			self.api().update_achievement(&request).await?;
		}
		Ok(())
	}

	/// Support an achievement with a direct transfer from wallet funds.
	pub async fn support_achievement(
		&mut self,
		amount: u64,
		_fees: u64,
		recipient_wallet_address: &str,
	) -> Result<(), ActionError> {
		let (address, key) = match self.wallet_signer() {
			Ok(signer) => signer,
			Err(err) => {
				self.notify(Notice::SupportAchievementFailed);
				return Err(err);
			}
		};
		let _slot = match self.transfer_guard().claim(&address) {
			Ok(slot) => slot,
			Err(err) => {
				self.notify(Notice::TransferAlreadyPending);
				return Err(err);
			}
		};

		self.apply(StateCommand::SetAchievementPhase(
			AchievementOp::Support,
			AsyncPhase::Requested,
		));

		let outcome = self
			.chain()
			.transfer(
				&address,
				recipient_wallet_address,
				to_base_units(amount),
				&key,
			)
			.await
			.map_err(ActionError::from);
		self.finish_phase(
			AchievementOp::Support,
			Notice::SupportAchievementSucceeded,
			Notice::SupportAchievementFailed,
			outcome,
		)
	}

	/// Deposit funds towards an achievement, pending witness confirmation.
	///
	/// Three steps, strictly in order: the backend encodes the deposit
	/// target, the chain provider builds a raw funded transaction against
	/// it, and the backend records the raw transaction with its metadata.
	pub async fn deposit_for_achievement(
		&mut self,
		request: DepositRequest,
	) -> Result<(), ActionError> {
		let (address, key) = match self.wallet_signer() {
			Ok(signer) => signer,
			Err(err) => {
				self.notify(Notice::DepositAchievementFailed);
				return Err(err);
			}
		};
		let _slot = match self.transfer_guard().claim(&address) {
			Ok(slot) => slot,
			Err(err) => {
				self.notify(Notice::TransferAlreadyPending);
				return Err(err);
			}
		};

		self.apply(StateCommand::SetAchievementPhase(
			AchievementOp::Deposit,
			AsyncPhase::Requested,
		));

		let outcome = self.deposit_inner(&request, &address, &key).await;
		self.finish_phase(
			AchievementOp::Deposit,
			Notice::DepositAchievementSucceeded,
			Notice::DepositAchievementFailed,
			outcome,
		)
	}

	async fn deposit_inner(
		&mut self,
		request: &DepositRequest,
		address: &str,
		key: &str,
	) -> Result<(), ActionError> {
		let identity = self.current_identity()?;

		let encoded = self
			.api()
			.encode_deposit(&request.link, &request.witness_address)
			.await?;

		let raw_tx = self
			.chain()
			.build_contract_send(
				&encoded.address,
				&encoded.encoded_data,
				to_base_units(request.amount),
				request.fees,
				key,
			)
			.await?;

		self.api()
			.record_deposit(&DepositRecordRequest {
				address: address.to_string(),
				link: request.link.clone(),
				raw_tx: raw_tx.0,
				token: identity.access_token,
				user: identity.user_id,
				witness: request.witness_user_id.clone(),
				witness_name: request.witness_name.clone(),
			})
			.await?;
		Ok(())
	}

	/// Withdraw funds from the hot wallet to an external address. The key
	/// backing this wallet is held readily available for signing; callers
	/// are expected to surface the custody caveat to the user.
	pub async fn withdraw_from_hot_wallet(
		&mut self,
		address: &str,
		amount: u64,
		_fees: u64,
	) -> Result<(), ActionError> {
		let (from, key) = match self.wallet_signer() {
			Ok(signer) => signer,
			Err(err) => {
				self.notify(Notice::WithdrawFailed);
				return Err(err);
			}
		};
		let _slot = match self.transfer_guard().claim(&from) {
			Ok(slot) => slot,
			Err(err) => {
				self.notify(Notice::TransferAlreadyPending);
				return Err(err);
			}
		};

		match self
			.chain()
			.transfer(&from, address, to_base_units(amount), &key)
			.await
		{
			Ok(()) => {
				info!("withdrew {} from {}", amount, from);
				self.notify(Notice::WithdrawSucceeded);
				Ok(())
			}
			Err(err) => {
				error!("withdrawal from {} failed: {}", from, err);
				self.notify(Notice::WithdrawFailed);
				Err(err.into())
			}
		}
	}

	/// Fetch the registered user list into state.
	pub async fn fetch_users(&mut self) -> Result<(), ActionError> {
		match self.api().fetch_users().await {
			Ok(users) => {
				self.apply(StateCommand::SetUsers(users));
				Ok(())
			}
			Err(err) => {
				error!("user list fetch failed: {}", err);
				self.notify(Notice::FetchUsersFailed);
				Err(err.into())
			}
		}
	}

	/// Check the explorer for unconfirmed transactions on the session
	/// wallet and record the result in wallet meta.
	pub async fn check_pending_transactions(&mut self) -> Result<(), ActionError> {
		let (address, _) = match self.wallet_signer() {
			Ok(signer) => signer,
			Err(err) => {
				self.notify(Notice::FetchTransactionsFailed);
				return Err(err);
			}
		};

		match self.api().pending_transactions(&address).await {
			Ok(pending) => {
				self.apply(StateCommand::SetTransactions(pending.clone()));
				self.apply(StateCommand::PatchWalletMeta(WalletMetaPatch {
					has_pending_transactions: Some(!pending.is_empty()),
					..Default::default()
				}));
				Ok(())
			}
			Err(err) => {
				error!("pending transaction check failed: {}", err);
				self.notify(Notice::FetchTransactionsFailed);
				Err(err.into())
			}
		}
	}

	/// Replace the achievements list with a freshly fetched feed.
	pub fn update_achievements(&mut self, achievements: Vec<Achievement>) {
		self.apply(StateCommand::SetAchievements(achievements));
	}

	/// Report that the achievements feed could not be fetched.
	pub fn report_achievements_fetch_failed(&mut self) {
		self.notify(Notice::FetchAchievementsFailed);
	}

	/// Show the introductory help dialog.
	pub fn show_help(&mut self) {
		self.apply(StateCommand::SetShowHelp(true));
	}

	/// Hide the help dialog, optionally persisting the opt-out flag.
	pub async fn hide_help(&mut self, dont_show_again: bool) -> Result<(), ActionError> {
		self.apply(StateCommand::SetShowHelp(false));
		if dont_show_again {
			self.keystore().set_help_dismissed(true).await?;
		}
		Ok(())
	}

	/// Close out a three-phase operation: exactly one notice, and the
	/// phase either `Succeeded` or `Failed` carrying the error text.
	fn finish_phase(
		&mut self,
		op: AchievementOp,
		success: Notice,
		failure: Notice,
		outcome: Result<(), ActionError>,
	) -> Result<(), ActionError> {
		match outcome {
			Ok(()) => {
				self.apply(StateCommand::SetAchievementPhase(op, AsyncPhase::Succeeded));
				self.notify(success);
				Ok(())
			}
			Err(err) => {
				error!("{:?} action failed: {}", op, err);
				self.notify(failure);
				self.apply(StateCommand::SetAchievementPhase(
					op,
					AsyncPhase::Failed(err.to_string()),
				));
				Err(err)
			}
		}
	}
}
