//! In-memory wallet: a verification-key to signing-key map plus one public
//! DID keypair created at construction.
//!
//! The lock is held only for map lookups and inserts, never across the
//! cryptographic work, so concurrent unpack calls do not serialise on it.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use parking_lot::RwLock;
use relay_crypto::envelope;
use relay_crypto::keys::{SigningKeyPair, VerificationKey, KEY_LEN};

use crate::{DidInfo, KeyInfo, UnpackedMessage, Wallet, WalletError};

pub struct KeystoreWallet {
    /// verkey (base64url) -> signing secret
    keys: RwLock<HashMap<String, [u8; KEY_LEN]>>,
    public_did: String,
}

impl KeystoreWallet {
    /// Fresh wallet with a newly generated public DID keypair.
    pub fn new() -> Self {
        Self::with_did_keypair(SigningKeyPair::generate())
    }

    /// Wallet whose public DID keypair derives from a fixed 32-byte seed,
    /// giving a stable identity across restarts.
    pub fn from_did_seed(seed: &str) -> Result<Self, WalletError> {
        Ok(Self::with_did_keypair(keypair_from_seed(seed)?))
    }

    fn with_did_keypair(keypair: SigningKeyPair) -> Self {
        let public_did = did_from_verkey(&keypair.public);
        let mut keys = HashMap::new();
        keys.insert(keypair.public.to_b64(), *keypair.secret_bytes());
        Self {
            keys: RwLock::new(keys),
            public_did,
        }
    }

    fn store(&self, keypair: &SigningKeyPair) -> KeyInfo {
        let verkey = keypair.public.to_b64();
        self.keys
            .write()
            .insert(verkey.clone(), *keypair.secret_bytes());
        KeyInfo { verkey }
    }

    fn keypair_for(&self, verkey: &str) -> Result<SigningKeyPair, WalletError> {
        let secret = self
            .keys
            .read()
            .get(verkey)
            .copied()
            .ok_or_else(|| WalletError::UnknownKey(verkey.to_string()))?;
        Ok(SigningKeyPair::from_bytes(&secret)?)
    }
}

impl Default for KeystoreWallet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Wallet for KeystoreWallet {
    async fn create_signing_key(&self, seed: Option<&str>) -> Result<KeyInfo, WalletError> {
        let keypair = match seed {
            Some(seed) => keypair_from_seed(seed)?,
            None => SigningKeyPair::generate(),
        };
        Ok(self.store(&keypair))
    }

    async fn get_public_did(&self) -> Result<DidInfo, WalletError> {
        Ok(DidInfo {
            did: self.public_did.clone(),
        })
    }

    async fn pack_message(
        &self,
        message: &[u8],
        sender_verkey: &str,
        recipient_verkey: &str,
    ) -> Result<Vec<u8>, WalletError> {
        let sender = self.keypair_for(sender_verkey)?;
        let recipient = VerificationKey::from_b64(recipient_verkey)?;
        Ok(envelope::pack(message, &sender, &recipient)?)
    }

    async fn unpack_message(&self, packed: &[u8]) -> Result<UnpackedMessage, WalletError> {
        let parsed = envelope::parse(packed)?;
        let secret = self
            .keys
            .read()
            .get(&parsed.recipient_key)
            .copied()
            .ok_or(WalletError::UnknownRecipient)?;
        let recipient = SigningKeyPair::from_bytes(&secret)?;

        let opened = envelope::open(&parsed, &recipient)?;
        let message =
            String::from_utf8(opened.message.to_vec()).map_err(|_| WalletError::NotUtf8)?;

        Ok(UnpackedMessage {
            message,
            sender_verkey: opened.sender_key.to_b64(),
            recipient_verkey: opened.recipient_key.to_b64(),
        })
    }
}

/// Derive a DID from a verification key: the method-specific id is the
/// base64url encoding of the first 16 key bytes.
fn did_from_verkey(verkey: &VerificationKey) -> String {
    format!("did:relay:{}", URL_SAFE_NO_PAD.encode(&verkey.0[..16]))
}

fn keypair_from_seed(seed: &str) -> Result<SigningKeyPair, WalletError> {
    let bytes = seed.as_bytes();
    if bytes.len() != KEY_LEN {
        return Err(WalletError::InvalidSeed(format!(
            "seed must be {KEY_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(SigningKeyPair::from_bytes(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "000000000000000000000000Trustee1";

    #[tokio::test]
    async fn seed_derives_the_same_key_every_time() {
        let wallet = KeystoreWallet::new();
        let first = wallet.create_signing_key(Some(SEED)).await.unwrap();
        let second = wallet.create_signing_key(Some(SEED)).await.unwrap();
        assert_eq!(first.verkey, second.verkey);
    }

    #[tokio::test]
    async fn short_seed_is_rejected() {
        let wallet = KeystoreWallet::new();
        let err = wallet.create_signing_key(Some("tiny")).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidSeed(_)));
    }

    #[tokio::test]
    async fn pack_unpack_round_trip() {
        let wallet = KeystoreWallet::new();
        let sender = wallet.create_signing_key(None).await.unwrap().verkey;
        let recipient = wallet.create_signing_key(None).await.unwrap().verkey;

        let packed = wallet
            .pack_message(b"{\"hop\":1}", &sender, &recipient)
            .await
            .unwrap();
        let unpacked = wallet.unpack_message(&packed).await.unwrap();

        assert_eq!(unpacked.message, "{\"hop\":1}");
        assert_eq!(unpacked.sender_verkey, sender);
        assert_eq!(unpacked.recipient_verkey, recipient);
    }

    #[tokio::test]
    async fn pack_requires_a_held_sender_key() {
        let wallet = KeystoreWallet::new();
        let recipient = wallet.create_signing_key(None).await.unwrap().verkey;
        let foreign = SigningKeyPair::generate().public.to_b64();

        let err = wallet
            .pack_message(b"x", &foreign, &recipient)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::UnknownKey(_)));
    }

    #[tokio::test]
    async fn unpack_without_the_recipient_key_fails() {
        let sender_wallet = KeystoreWallet::new();
        let sender = sender_wallet.create_signing_key(None).await.unwrap().verkey;
        let recipient = SigningKeyPair::generate();

        let packed = sender_wallet
            .pack_message(b"x", &sender, &recipient.public.to_b64())
            .await
            .unwrap();

        let other_wallet = KeystoreWallet::new();
        let err = other_wallet.unpack_message(&packed).await.unwrap_err();
        assert!(matches!(err, WalletError::UnknownRecipient));
    }

    #[tokio::test]
    async fn non_utf8_payload_is_rejected() {
        let wallet = KeystoreWallet::new();
        let sender = wallet.create_signing_key(None).await.unwrap().verkey;
        let recipient = wallet.create_signing_key(None).await.unwrap().verkey;

        let packed = wallet
            .pack_message(&[0xff, 0xfe, 0xfd], &sender, &recipient)
            .await
            .unwrap();
        let err = wallet.unpack_message(&packed).await.unwrap_err();
        assert!(matches!(err, WalletError::NotUtf8));
    }

    #[tokio::test]
    async fn public_did_is_stable_for_a_seed() {
        let a = KeystoreWallet::from_did_seed(SEED).unwrap();
        let b = KeystoreWallet::from_did_seed(SEED).unwrap();
        let did_a = a.get_public_did().await.unwrap().did;
        let did_b = b.get_public_did().await.unwrap().did;
        assert_eq!(did_a, did_b);
        assert!(did_a.starts_with("did:relay:"));
    }
}
