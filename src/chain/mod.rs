//! Blockchain capability provider.
//!
//! The Diadem chain is an external capability: account lookup, balance
//! queries, transfers and raw funded-transaction construction go through
//! the [`ChainProvider`] trait, backed in production by a JSON-RPC node
//! client. Key derivation is local and lives in [`keys`].

pub mod keys;
pub mod provider;

pub use provider::{ChainAccount, ChainError, ChainProvider, NodeChainProvider, RawTransaction};

/// Prefix of every Diadem wallet address.
pub const ADDRESS_PREFIX: &str = "ddm";

/// Derive the wallet address for an identity. The address is always the
/// fixed prefix joined with the durable user ID.
pub fn wallet_address_for(user_id: &str) -> String {
	format!("{}-{}", ADDRESS_PREFIX, user_id)
}

/// Recover the user ID from a wallet address, if it carries the Diadem
/// prefix.
pub fn user_id_from_address(address: &str) -> Option<&str> {
	address.strip_prefix(ADDRESS_PREFIX)?.strip_prefix('-')
}
