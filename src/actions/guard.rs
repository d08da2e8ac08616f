//! Single-slot in-flight guard for value-transfer actions.
//!
//! Two concurrent transfers reading the same wallet balance would race;
//! the guard holds at most one in-flight slot per wallet address, and a
//! second claim fails with [`ActionError::TransferAlreadyPending`] instead
//! of silently submitting twice. The slot is released when the claim is
//! dropped, on success and failure alike.

use super::error::ActionError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct TransferGuard {
	in_flight: Arc<Mutex<HashSet<String>>>,
}

impl TransferGuard {
	pub fn new() -> Self {
		Self::default()
	}

	/// Claim the slot for an address, failing if one is already held.
	pub fn claim(&self, address: &str) -> Result<InFlightTransfer, ActionError> {
		let mut in_flight = self.in_flight.lock().expect("transfer guard poisoned");
		if !in_flight.insert(address.to_string()) {
			return Err(ActionError::TransferAlreadyPending(address.to_string()));
		}
		Ok(InFlightTransfer {
			address: address.to_string(),
			in_flight: self.in_flight.clone(),
		})
	}
}

/// RAII handle for a claimed transfer slot.
pub struct InFlightTransfer {
	address: String,
	in_flight: Arc<Mutex<HashSet<String>>>,
}

impl Drop for InFlightTransfer {
	fn drop(&mut self) {
		self.in_flight
			.lock()
			.expect("transfer guard poisoned")
			.remove(&self.address);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn second_claim_on_same_address_fails() {
		let guard = TransferGuard::new();
		let _slot = guard.claim("ddm-1").unwrap();
		assert!(matches!(
			guard.claim("ddm-1"),
			Err(ActionError::TransferAlreadyPending(_))
		));
		// a different address is unaffected
		assert!(guard.claim("ddm-2").is_ok());
	}

	#[test]
	fn dropping_the_slot_releases_it() {
		let guard = TransferGuard::new();
		drop(guard.claim("ddm-1").unwrap());
		assert!(guard.claim("ddm-1").is_ok());
	}
}
