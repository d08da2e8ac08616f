//! Local key material handling.
//!
//! Keys are derived deterministically: a brain-key phrase is normalized
//! and digested into an Ed25519 signing key, so the same phrase always
//! reconstructs the same keypair. The serialized private key ("WIF") is
//! the hex-encoded signing key; public keys carry a `DDM` prefix.

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of words in a suggested brain-key phrase.
pub const BRAIN_KEY_WORDS: usize = 12;

const PUBLIC_KEY_PREFIX: &str = "DDM";

/// Wordlist for suggested brain-key phrases.
const WORDLIST: &[&str] = &[
	"amber", "anchor", "basin", "beacon", "birch", "bramble", "canyon", "cedar", "cinder",
	"cliff", "coral", "crater", "delta", "drift", "ember", "fable", "fjord", "flint", "gale",
	"glade", "granite", "grove", "harbor", "hazel", "heron", "hollow", "ivory", "juniper",
	"kestrel", "lagoon", "larch", "lichen", "marsh", "meadow", "mesa", "mistral", "moraine",
	"nectar", "oasis", "ochre", "onyx", "osprey", "pebble", "pine", "plume", "prairie",
	"quarry", "quartz", "raven", "reef", "ridge", "rowan", "saffron", "sage", "shale",
	"sierra", "sorrel", "sparrow", "spruce", "summit", "thicket", "tundra", "umber", "willow",
];

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
	#[error("malformed private key: {0}")]
	MalformedWif(String),
}

/// A signing keypair in its serialized forms. Signing itself happens
/// behind the node boundary, which receives the serialized key.
#[derive(Clone)]
pub struct KeyMaterial {
	wif: String,
	public_key: String,
}

impl KeyMaterial {
	fn from_secret_bytes(secret: [u8; 32]) -> Self {
		let signing_key = SigningKey::from_bytes(&secret);
		let wif = hex::encode(secret);
		let public_key = encode_public_key(&signing_key.verifying_key());
		Self { wif, public_key }
	}

	/// Derive key material deterministically from a brain-key phrase.
	pub fn from_brain_key(phrase: &str) -> Self {
		let normalized = phrase
			.split_whitespace()
			.map(|word| word.to_lowercase())
			.collect::<Vec<_>>()
			.join(" ");
		let secret: [u8; 32] = Sha256::digest(normalized.as_bytes()).into();
		Self::from_secret_bytes(secret)
	}

	/// Reconstruct key material from a stored serialized private key.
	pub fn from_wif(wif: &str) -> Result<Self, KeyError> {
		let bytes = hex::decode(wif.trim())
			.map_err(|e| KeyError::MalformedWif(format!("invalid hex: {}", e)))?;
		let secret: [u8; 32] = bytes
			.try_into()
			.map_err(|_| KeyError::MalformedWif("expected 32 bytes".to_string()))?;
		Ok(Self::from_secret_bytes(secret))
	}

	/// The serialized private key, as persisted in the keystore.
	pub fn wif(&self) -> &str {
		&self.wif
	}

	/// The public key registered with the backend.
	pub fn public_key(&self) -> &str {
		&self.public_key
	}
}

impl std::fmt::Debug for KeyMaterial {
	// never leak the secret through debug output
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("KeyMaterial")
			.field("public_key", &self.public_key)
			.finish()
	}
}

fn encode_public_key(key: &VerifyingKey) -> String {
	format!("{}{}", PUBLIC_KEY_PREFIX, hex::encode(key.to_bytes()))
}

/// Suggest a fresh brain-key phrase for a new wallet.
pub fn suggest_brain_key() -> String {
	let mut rng = rand::thread_rng();
	(0..BRAIN_KEY_WORDS)
		.map(|_| WORDLIST[rng.gen_range(0..WORDLIST.len())])
		.collect::<Vec<_>>()
		.join(" ")
}
