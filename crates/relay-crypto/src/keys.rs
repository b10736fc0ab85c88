//! Signing key material.
//!
//! Each wallet-held identity is one Ed25519 keypair. The public half is the
//! *verification key* that addresses envelopes; the secret half never leaves
//! the wallet. Envelope DH converts both halves to X25519 (clamped SHA-512
//! expansion for the secret, birational map for the public, mirroring
//! libsignal's identity-key conversion).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Ed25519 key length; seeds must be exactly this long.
pub const KEY_LEN: usize = 32;

// ── Verification key ─────────────────────────────────────────────────────────

/// 32-byte Ed25519 verification key, base64url-encoded on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationKey(pub Vec<u8>);

impl VerificationKey {
    pub fn to_b64(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.0)
    }

    pub fn from_b64(s: &str) -> Result<Self, CryptoError> {
        let bytes = URL_SAFE_NO_PAD.decode(s)?;
        if bytes.len() != KEY_LEN {
            return Err(CryptoError::InvalidKey(format!(
                "Verification key must be {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Short hex fingerprint for log lines: BLAKE3 of the key bytes,
    /// truncated to 8 bytes. Never log the full key next to an envelope.
    pub fn fingerprint(&self) -> String {
        let hash = blake3::hash(&self.0);
        hex::encode(&hash.as_bytes()[..8])
    }

    /// X25519 public key for envelope DH.
    pub(crate) fn to_x25519(&self) -> Result<X25519Public, CryptoError> {
        let ed_pub: [u8; KEY_LEN] = self
            .0
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("verification key not 32 bytes".into()))?;
        ed25519_pub_to_x25519(&ed_pub)
    }
}

// ── Signing keypair ──────────────────────────────────────────────────────────

/// Wallet-held signing keypair. Drop clears the secret via ZeroizeOnDrop.
#[derive(ZeroizeOnDrop)]
pub struct SigningKeyPair {
    #[zeroize(skip)]
    pub public: VerificationKey,
    secret_bytes: [u8; KEY_LEN],
}

impl SigningKeyPair {
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Deterministic keypair from 32 secret bytes (a stored key or a seed).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != KEY_LEN {
            return Err(CryptoError::InvalidKey(format!(
                "Signing key must be {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; KEY_LEN];
        arr.copy_from_slice(bytes);
        Ok(Self::from_signing_key(SigningKey::from_bytes(&arr)))
    }

    fn from_signing_key(key: SigningKey) -> Self {
        let public = VerificationKey(key.verifying_key().to_bytes().to_vec());
        Self {
            public,
            secret_bytes: key.to_bytes(),
        }
    }

    pub fn secret_bytes(&self) -> &[u8; KEY_LEN] {
        &self.secret_bytes
    }

    /// X25519 static secret for envelope DH.
    pub(crate) fn to_x25519_secret(&self) -> StaticSecret {
        ed25519_secret_to_x25519(&self.secret_bytes)
    }
}

// ── Ed25519 to X25519 conversion ─────────────────────────────────────────────

/// Convert an Ed25519 signing secret to an X25519 static secret.
/// Uses the clamped SHA-512 expansion that ed25519-dalek applies internally.
pub fn ed25519_secret_to_x25519(ed_secret: &[u8; KEY_LEN]) -> StaticSecret {
    use sha2::{Digest, Sha512};
    let mut h = Sha512::digest(ed_secret);
    // Clamp as per RFC 7748 §5
    h[0] &= 248;
    h[31] &= 127;
    h[31] |= 64;
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&h[..KEY_LEN]);
    h.as_mut_slice().zeroize();
    StaticSecret::from(key)
}

/// Convert an Ed25519 verifying key to an X25519 public key via the
/// birational map from the Ed25519 curve to Curve25519.
pub fn ed25519_pub_to_x25519(ed_pub: &[u8; KEY_LEN]) -> Result<X25519Public, CryptoError> {
    use curve25519_dalek::edwards::CompressedEdwardsY;
    let compressed = CompressedEdwardsY::from_slice(ed_pub)
        .map_err(|_| CryptoError::InvalidKey("invalid Ed25519 public key".into()))?;
    let point = compressed
        .decompress()
        .ok_or_else(|| CryptoError::InvalidKey("Ed25519 public key decompression failed".into()))?;
    Ok(X25519Public::from(point.to_montgomery().to_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_distinct_keys() {
        let a = SigningKeyPair::generate();
        let b = SigningKeyPair::generate();
        assert_ne!(a.public, b.public);
    }

    #[test]
    fn from_bytes_is_deterministic() {
        let seed = [7u8; KEY_LEN];
        let a = SigningKeyPair::from_bytes(&seed).unwrap();
        let b = SigningKeyPair::from_bytes(&seed).unwrap();
        assert_eq!(a.public, b.public);
        assert_eq!(a.secret_bytes(), b.secret_bytes());
    }

    #[test]
    fn from_bytes_rejects_short_input() {
        assert!(SigningKeyPair::from_bytes(b"short").is_err());
    }

    #[test]
    fn b64_round_trip() {
        let keypair = SigningKeyPair::generate();
        let encoded = keypair.public.to_b64();
        let decoded = VerificationKey::from_b64(&encoded).unwrap();
        assert_eq!(decoded, keypair.public);
    }

    #[test]
    fn from_b64_rejects_wrong_length() {
        let encoded = URL_SAFE_NO_PAD.encode([1u8; 16]);
        assert!(VerificationKey::from_b64(&encoded).is_err());
    }

    #[test]
    fn fingerprint_is_short_hex() {
        let keypair = SigningKeyPair::generate();
        let fp = keypair.public.fingerprint();
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn public_key_converts_to_x25519() {
        let keypair = SigningKeyPair::generate();
        assert!(keypair.public.to_x25519().is_ok());
    }
}
