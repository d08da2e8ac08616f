//! User-facing notification catalog.
//!
//! Every orchestration outcome that the user should see maps to exactly one
//! variant of [`Notice`]. The set is closed so the presentation layer can
//! match it exhaustively instead of dispatching on string keys. Notices are
//! delivered through a [`NoticeSink`], which the host wires to its toast or
//! message UI; the default sink writes them to the diagnostic log.

/// Severity of a notice, used by sinks to pick a rendering channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
	Info,
	Success,
	Error,
}

/// The closed set of user-facing notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
	LoginSucceeded,
	LoginCheckFailed,
	WalletGenerated,
	WalletRestored,
	WalletLoadFailed,
	WalletRefreshFailed,
	WalletRecoverFailed,
	RecoverInputInvalid,
	UserRegistrationConfirmed,
	ConfirmAchievementSucceeded,
	ConfirmAchievementFailed,
	CreateAchievementSucceeded,
	CreateAchievementFailed,
	UpdateAchievementSucceeded,
	UpdateAchievementFailed,
	SupportAchievementSucceeded,
	SupportAchievementFailed,
	DepositAchievementSucceeded,
	DepositAchievementFailed,
	WithdrawSucceeded,
	WithdrawFailed,
	TransferAlreadyPending,
	FetchUsersFailed,
	FetchAchievementsFailed,
	FetchTransactionsFailed,
}

impl Notice {
	pub fn severity(&self) -> Severity {
		match self {
			Notice::LoginSucceeded => Severity::Info,
			Notice::WalletGenerated
			| Notice::WalletRestored
			| Notice::UserRegistrationConfirmed
			| Notice::ConfirmAchievementSucceeded
			| Notice::CreateAchievementSucceeded
			| Notice::UpdateAchievementSucceeded
			| Notice::SupportAchievementSucceeded
			| Notice::DepositAchievementSucceeded
			| Notice::WithdrawSucceeded => Severity::Success,
			_ => Severity::Error,
		}
	}

	pub fn is_failure(&self) -> bool {
		self.severity() == Severity::Error
	}

	/// The message shown to the user.
	pub fn message(&self) -> &'static str {
		match self {
			Notice::LoginSucceeded => "Logged in with Facebook",
			Notice::LoginCheckFailed => "Could not verify your account, please try again",
			Notice::WalletGenerated => "A new wallet was generated for your account",
			Notice::WalletRestored => "Your wallet was restored",
			Notice::WalletLoadFailed => "Your wallet could not be loaded",
			Notice::WalletRefreshFailed => "Your wallet balance could not be refreshed",
			Notice::WalletRecoverFailed => "Wallet recovery failed",
			Notice::RecoverInputInvalid => {
				"Provide either a mnemonic phrase or a private key, not both"
			}
			Notice::UserRegistrationConfirmed => "Your registration is confirmed",
			Notice::ConfirmAchievementSucceeded => "Achievement confirmed",
			Notice::ConfirmAchievementFailed => "Achievement could not be confirmed",
			Notice::CreateAchievementSucceeded => "Achievement created",
			Notice::CreateAchievementFailed => "Achievement could not be created",
			Notice::UpdateAchievementSucceeded => "Achievement updated",
			Notice::UpdateAchievementFailed => "Achievement could not be updated",
			Notice::SupportAchievementSucceeded => "Thank you for your support",
			Notice::SupportAchievementFailed => "Support transfer failed",
			Notice::DepositAchievementSucceeded => "Deposit recorded, awaiting witness confirmation",
			Notice::DepositAchievementFailed => "Deposit failed",
			Notice::WithdrawSucceeded => "Tokens withdrawn from your wallet",
			Notice::WithdrawFailed => "Withdrawal failed",
			Notice::TransferAlreadyPending => "Another transfer is already in progress",
			Notice::FetchUsersFailed => "User list could not be fetched",
			Notice::FetchAchievementsFailed => "Achievements could not be fetched",
			Notice::FetchTransactionsFailed => "Transactions could not be checked",
		}
	}
}

/// Sink for delivering notices to the user.
pub trait NoticeSink: Send + Sync {
	fn notify(&self, notice: Notice);
}

/// Sink that writes notices to the diagnostic log.
pub struct TracingNoticeSink;

impl NoticeSink for TracingNoticeSink {
	fn notify(&self, notice: Notice) {
		match notice.severity() {
			Severity::Error => tracing::warn!("notice: {}", notice.message()),
			_ => tracing::info!("notice: {}", notice.message()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn failure_notices_are_errors() {
		assert!(Notice::WalletRecoverFailed.is_failure());
		assert!(Notice::TransferAlreadyPending.is_failure());
		assert!(!Notice::WalletRestored.is_failure());
		assert_eq!(Notice::LoginSucceeded.severity(), Severity::Info);
	}
}
