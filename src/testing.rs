//! In-memory doubles for the orchestration seams, used by unit tests.

use crate::actions::Orchestrator;
use crate::api::{
	AchievementWriteRequest, ApiError, BackendApi, ConfirmAchievementRequest,
	DepositRecordRequest, EncodedDeposit, RegisterUserRequest,
};
use crate::chain::{ChainAccount, ChainError, ChainProvider, RawTransaction};
use crate::keystore::{Keystore, KeystoreError};
use crate::notify::{Notice, NoticeSink, Severity};
use crate::state::{SessionIdentity, UserSummary};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub fn identity(user_id: &str) -> SessionIdentity {
	SessionIdentity {
		access_token: "token-abc".to_string(),
		name: "Ada".to_string(),
		user_id: user_id.to_string(),
	}
}

/// Recording backend double. Existence checks are driven by the `users`
/// and `bindings` sets; `set_failing(true)` makes every call reject with
/// a simulated transport error.
#[derive(Clone, Default)]
pub struct MockBackend {
	inner: Arc<MockBackendInner>,
}

#[derive(Default)]
struct MockBackendInner {
	users: Mutex<HashSet<String>>,
	bindings: Mutex<HashSet<(String, String)>>,
	users_list: Mutex<Vec<UserSummary>>,
	pending: Mutex<Vec<String>>,
	fail: AtomicBool,
	calls: Mutex<Vec<String>>,
}

impl MockBackend {
	pub fn with_user(self, user_id: &str) -> Self {
		self.inner.users.lock().unwrap().insert(user_id.to_string());
		self
	}

	pub fn with_binding(self, user_id: &str, address: &str) -> Self {
		self.inner
			.bindings
			.lock()
			.unwrap()
			.insert((user_id.to_string(), address.to_string()));
		self
	}

	pub fn set_failing(&self, failing: bool) {
		self.inner.fail.store(failing, Ordering::SeqCst);
	}

	pub fn set_users_list(&self, users: Vec<UserSummary>) {
		*self.inner.users_list.lock().unwrap() = users;
	}

	pub fn set_pending(&self, pending: Vec<String>) {
		*self.inner.pending.lock().unwrap() = pending;
	}

	pub fn calls(&self) -> Vec<String> {
		self.inner.calls.lock().unwrap().clone()
	}

	fn record(&self, call: &str) -> Result<(), ApiError> {
		self.inner.calls.lock().unwrap().push(call.to_string());
		if self.inner.fail.load(Ordering::SeqCst) {
			return Err(ApiError::Backend("simulated transport failure".to_string()));
		}
		Ok(())
	}
}

#[async_trait::async_trait]
impl BackendApi for MockBackend {
	async fn check_user(&self, user: &str) -> Result<bool, ApiError> {
		self.record("check_user")?;
		Ok(self.inner.users.lock().unwrap().contains(user))
	}

	async fn check_user_address(
		&self,
		user: &str,
		wallet_address: &str,
	) -> Result<bool, ApiError> {
		self.record("check_user_address")?;
		Ok(self
			.inner
			.bindings
			.lock()
			.unwrap()
			.contains(&(user.to_string(), wallet_address.to_string())))
	}

	async fn register_user(&self, request: &RegisterUserRequest) -> Result<(), ApiError> {
		self.record("register_user")?;
		self.inner
			.users
			.lock()
			.unwrap()
			.insert(request.user.clone());
		self.inner
			.bindings
			.lock()
			.unwrap()
			.insert((request.user.clone(), request.address.clone()));
		Ok(())
	}

	async fn confirm_achievement(
		&self,
		_request: &ConfirmAchievementRequest,
	) -> Result<(), ApiError> {
		self.record("confirm_achievement")
	}

	async fn create_achievement(
		&self,
		_request: &AchievementWriteRequest,
	) -> Result<(), ApiError> {
		self.record("create_achievement")
	}

	async fn update_achievement(
		&self,
		_request: &AchievementWriteRequest,
	) -> Result<(), ApiError> {
		self.record("update_achievement")
	}

	async fn encode_deposit(
		&self,
		_link: &str,
		_witness: &str,
	) -> Result<EncodedDeposit, ApiError> {
		self.record("encode_deposit")?;
		Ok(EncodedDeposit {
			address: "1.27.9".to_string(),
			encoded_data: "00ff".to_string(),
		})
	}

	async fn record_deposit(&self, _request: &DepositRecordRequest) -> Result<(), ApiError> {
		self.record("record_deposit")
	}

	async fn fetch_users(&self) -> Result<Vec<UserSummary>, ApiError> {
		self.record("fetch_users")?;
		Ok(self.inner.users_list.lock().unwrap().clone())
	}

	async fn pending_transactions(&self, _address: &str) -> Result<Vec<String>, ApiError> {
		self.record("pending_transactions")?;
		Ok(self.inner.pending.lock().unwrap().clone())
	}
}

/// Recording chain double. Accounts resolve for any name; transfers and
/// raw-transaction builds are recorded for inspection.
#[derive(Clone, Default)]
pub struct MockChain {
	inner: Arc<MockChainInner>,
}

#[derive(Default)]
struct MockChainInner {
	balances: Mutex<HashMap<String, u128>>,
	fail: AtomicBool,
	transfers: Mutex<Vec<(String, String, u128)>>,
	builds: Mutex<Vec<(String, String, u128)>>,
}

impl MockChain {
	pub fn with_balance(self, account_name: &str, balance: u128) -> Self {
		self.inner
			.balances
			.lock()
			.unwrap()
			.insert(format!("acct-{}", account_name), balance);
		self
	}

	pub fn set_failing(&self, failing: bool) {
		self.inner.fail.store(failing, Ordering::SeqCst);
	}

	pub fn transfers(&self) -> Vec<(String, String, u128)> {
		self.inner.transfers.lock().unwrap().clone()
	}

	pub fn builds(&self) -> Vec<(String, String, u128)> {
		self.inner.builds.lock().unwrap().clone()
	}

	fn check_failing(&self) -> Result<(), ChainError> {
		if self.inner.fail.load(Ordering::SeqCst) {
			return Err(ChainError::Rpc("simulated node failure".to_string()));
		}
		Ok(())
	}
}

#[async_trait::async_trait]
impl ChainProvider for MockChain {
	async fn account_by_name(&self, name: &str) -> Result<ChainAccount, ChainError> {
		self.check_failing()?;
		Ok(ChainAccount {
			id: format!("acct-{}", name),
			name: name.to_string(),
		})
	}

	async fn balance(&self, account_id: &str) -> Result<u128, ChainError> {
		self.check_failing()?;
		Ok(self
			.inner
			.balances
			.lock()
			.unwrap()
			.get(account_id)
			.copied()
			.unwrap_or(0))
	}

	async fn transfer(
		&self,
		from: &str,
		to: &str,
		amount: u128,
		_signing_key_wif: &str,
	) -> Result<(), ChainError> {
		self.check_failing()?;
		self.inner
			.transfers
			.lock()
			.unwrap()
			.push((from.to_string(), to.to_string(), amount));
		Ok(())
	}

	async fn build_contract_send(
		&self,
		target_address: &str,
		encoded_data: &str,
		amount: u128,
		_fee_rate: u64,
		_signing_key_wif: &str,
	) -> Result<RawTransaction, ChainError> {
		self.check_failing()?;
		self.inner.builds.lock().unwrap().push((
			target_address.to_string(),
			encoded_data.to_string(),
			amount,
		));
		Ok(RawTransaction("built-raw-tx".to_string()))
	}
}

/// In-memory keystore double.
#[derive(Clone, Default)]
pub struct MemoryKeystore {
	inner: Arc<MemoryKeystoreInner>,
}

#[derive(Default)]
struct MemoryKeystoreInner {
	keys: Mutex<HashMap<String, String>>,
	help_dismissed: Mutex<bool>,
}

impl MemoryKeystore {
	pub fn with_key(self, user_id: &str, wif: &str) -> Self {
		self.inner
			.keys
			.lock()
			.unwrap()
			.insert(user_id.to_string(), wif.to_string());
		self
	}

	pub fn stored_key(&self, user_id: &str) -> Option<String> {
		self.inner.keys.lock().unwrap().get(user_id).cloned()
	}
}

#[async_trait::async_trait]
impl Keystore for MemoryKeystore {
	async fn load_private_key(&self, user_id: &str) -> Result<Option<String>, KeystoreError> {
		Ok(self.inner.keys.lock().unwrap().get(user_id).cloned())
	}

	async fn store_private_key(&self, user_id: &str, wif: &str) -> Result<(), KeystoreError> {
		self.inner
			.keys
			.lock()
			.unwrap()
			.insert(user_id.to_string(), wif.to_string());
		Ok(())
	}

	async fn clear_private_key(&self, user_id: &str) -> Result<(), KeystoreError> {
		self.inner.keys.lock().unwrap().remove(user_id);
		Ok(())
	}

	async fn help_dismissed(&self) -> Result<bool, KeystoreError> {
		Ok(*self.inner.help_dismissed.lock().unwrap())
	}

	async fn set_help_dismissed(&self, dismissed: bool) -> Result<(), KeystoreError> {
		*self.inner.help_dismissed.lock().unwrap() = dismissed;
		Ok(())
	}
}

/// Notice sink that records everything it is asked to show.
#[derive(Clone, Default)]
pub struct RecordingSink {
	notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingSink {
	pub fn notices(&self) -> Vec<Notice> {
		self.notices.lock().unwrap().clone()
	}

	pub fn count(&self, notice: &Notice) -> usize {
		self.notices.lock().unwrap().iter().filter(|n| *n == notice).count()
	}

	pub fn failures(&self) -> usize {
		self.notices
			.lock()
			.unwrap()
			.iter()
			.filter(|n| n.is_failure())
			.count()
	}

	pub fn successes(&self) -> usize {
		self.notices
			.lock()
			.unwrap()
			.iter()
			.filter(|n| n.severity() == Severity::Success)
			.count()
	}

	pub fn clear(&self) {
		self.notices.lock().unwrap().clear();
	}
}

impl NoticeSink for RecordingSink {
	fn notify(&self, notice: Notice) {
		self.notices.lock().unwrap().push(notice);
	}
}

pub struct Harness {
	pub orchestrator: Orchestrator,
	pub api: MockBackend,
	pub chain: MockChain,
	pub keystore: MemoryKeystore,
	pub sink: RecordingSink,
}

pub fn harness(api: MockBackend, chain: MockChain, keystore: MemoryKeystore) -> Harness {
	let sink = RecordingSink::default();
	let orchestrator = Orchestrator::new(
		Box::new(api.clone()),
		Box::new(chain.clone()),
		Box::new(keystore.clone()),
		Box::new(sink.clone()),
	);
	Harness {
		orchestrator,
		api,
		chain,
		keystore,
		sink,
	}
}

/// A harness whose session is already logged in with a restored wallet,
/// ready for achievement and transfer actions. Setup notices are cleared.
pub async fn logged_in_harness(user_id: &str) -> Harness {
	let wif = crate::chain::keys::KeyMaterial::from_brain_key("amber basin cedar")
		.wif()
		.to_string();
	let address = crate::chain::wallet_address_for(user_id);
	let api = MockBackend::default()
		.with_user(user_id)
		.with_binding(user_id, &address);
	let chain = MockChain::default().with_balance(&address, 500_000_000);
	let keystore = MemoryKeystore::default().with_key(user_id, &wif);

	let mut h = harness(api, chain, keystore);
	h.orchestrator
		.handle_login(identity(user_id))
		.await
		.expect("login setup");
	assert_eq!(
		h.orchestrator.state().wallet.status,
		crate::state::WalletStatus::Restored
	);
	h.sink.clear();
	h
}
