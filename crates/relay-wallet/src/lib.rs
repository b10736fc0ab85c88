//! relay_wallet — the wallet capability consumed by the relay core.
//!
//! Key custody and envelope cryptography live behind the [`Wallet`] trait;
//! the core receives an implementation as an injected capability and never
//! touches key material directly. The provided implementation is the
//! in-memory [`KeystoreWallet`]; a deployment backed by an external key
//! store implements the same trait.

pub mod error;
pub mod keystore;

pub use error::WalletError;
pub use keystore::KeystoreWallet;

use async_trait::async_trait;

/// Key material returned by [`Wallet::create_signing_key`].
#[derive(Debug, Clone)]
pub struct KeyInfo {
    /// Verification key, base64url.
    pub verkey: String,
}

/// Public identifier returned by [`Wallet::get_public_did`].
#[derive(Debug, Clone)]
pub struct DidInfo {
    pub did: String,
}

/// An unpacked message: plaintext plus the key identities on both ends.
/// Transient; callers consume it immediately and drop it.
#[derive(Debug)]
pub struct UnpackedMessage {
    pub message: String,
    pub sender_verkey: String,
    pub recipient_verkey: String,
}

/// Wallet capability: key custody plus envelope pack/unpack.
///
/// Async because an implementation may sit on a slow or remote key store;
/// the decryption itself should be treated as potentially blocking work.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Create and store a signing key, optionally derived from a 32-byte
    /// seed (the same seed always yields the same key).
    async fn create_signing_key(&self, seed: Option<&str>) -> Result<KeyInfo, WalletError>;

    /// The wallet's public DID.
    async fn get_public_did(&self) -> Result<DidInfo, WalletError>;

    /// Seal `message` from `sender_verkey` (which must be held by this
    /// wallet) to `recipient_verkey`.
    async fn pack_message(
        &self,
        message: &[u8],
        sender_verkey: &str,
        recipient_verkey: &str,
    ) -> Result<Vec<u8>, WalletError>;

    /// Verify and decrypt a packed envelope addressed to a key held by
    /// this wallet.
    async fn unpack_message(&self, packed: &[u8]) -> Result<UnpackedMessage, WalletError>;
}
