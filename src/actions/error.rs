use crate::api::ApiError;
use crate::chain::keys::KeyError;
use crate::chain::provider::ChainError;
use crate::keystore::KeystoreError;

/// Error taxonomy of the orchestration layer.
///
/// Every exported action catches its own failures, translates them into a
/// single user-facing notice and, where relevant, a wallet status
/// transition; the error is still returned so callers can inspect it, but
/// it has already been reported by the time they see it.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
	#[error("backend API error: {0}")]
	Api(#[from] ApiError),

	#[error("chain provider error: {0}")]
	Chain(#[from] ChainError),

	#[error("keystore error: {0}")]
	Keystore(#[from] KeystoreError),

	#[error("key material error: {0}")]
	Key(#[from] KeyError),

	#[error("recovery requires exactly one of mnemonic or private key")]
	InvalidRecoveryInput,

	#[error("wallet address {address} does not belong to user {user_id}")]
	AddressMismatch { address: String, user_id: String },

	#[error("a transfer is already pending for {0}")]
	TransferAlreadyPending(String),

	#[error("no authenticated session")]
	SessionUnavailable,

	#[error("no wallet loaded for the current session")]
	WalletUnavailable,
}
