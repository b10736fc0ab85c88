//! Sealed message envelope — what arrives at the relay.
//!
//! The relay sees only the recipient's verification key (needed for the
//! keystore lookup) and opaque ciphertext. The sender's verification key
//! travels encrypted to the recipient, so the relay cannot learn who sent a
//! message; the payload key additionally mixes a static-static DH so the
//! recipient can authenticate the sender.
//!
//! Key schedule (fresh per envelope):
//!   ek        = ephemeral X25519 keypair
//!   dh_e      = DH(ek, recipient)
//!   k_sender  = HKDF-SHA256(dh_e,           info = "relay-envelope-v1 sender")
//!   dh_s      = DH(sender_static, recipient)
//!   k_payload = HKDF-SHA256(dh_e || dh_s,   info = "relay-envelope-v1 payload")
//!
//! Wire format: JSON, all binary fields base64url (no padding). The
//! ephemeral public key is bound into both AEAD blobs as associated data.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};
use zeroize::{Zeroize, Zeroizing};

use crate::aead;
use crate::error::CryptoError;
use crate::keys::{SigningKeyPair, VerificationKey, KEY_LEN};

pub const ENVELOPE_VERSION: u8 = 1;

const INFO_SENDER: &[u8] = b"relay-envelope-v1 sender";
const INFO_PAYLOAD: &[u8] = b"relay-envelope-v1 payload";

/// On-wire envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackedEnvelope {
    /// Format version for forward compatibility.
    pub version: u8,

    /// Recipient Ed25519 verification key (base64url). Routing only; the
    /// relay uses it to pick a keystore entry and learns nothing else.
    pub recipient_key: String,

    /// Per-envelope X25519 ephemeral public key (base64url).
    pub ephemeral_pub: String,

    /// Sender verification key, AEAD-encrypted under k_sender (base64url).
    pub sender: String,

    /// Message body, AEAD-encrypted under k_payload (base64url).
    pub ciphertext: String,
}

/// Result of opening an envelope. Plaintext is zeroized on drop.
pub struct OpenedEnvelope {
    pub message: Zeroizing<Vec<u8>>,
    pub sender_key: VerificationKey,
    pub recipient_key: VerificationKey,
}

fn b64d(s: &str) -> Result<Vec<u8>, CryptoError> {
    URL_SAFE_NO_PAD.decode(s).map_err(CryptoError::Base64Decode)
}

fn to_32(bytes: &[u8]) -> Result<[u8; 32], CryptoError> {
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidKey("expected 32-byte key".into()))
}

fn derive_key(ikm: &[u8], info: &[u8]) -> Result<[u8; 32], CryptoError> {
    let hk = Hkdf::<Sha256>::new(None, ikm);
    let mut key = [0u8; 32];
    hk.expand(info, &mut key)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

/// Seal `message` from `sender` to `recipient`, returning wire bytes.
pub fn pack(
    message: &[u8],
    sender: &SigningKeyPair,
    recipient: &VerificationKey,
) -> Result<Vec<u8>, CryptoError> {
    let recipient_x = recipient.to_x25519()?;

    let ephemeral_secret = StaticSecret::random_from_rng(OsRng);
    let ephemeral_pub = X25519Public::from(&ephemeral_secret);
    let dh_e = ephemeral_secret.diffie_hellman(&recipient_x);

    let k_sender = derive_key(dh_e.as_bytes(), INFO_SENDER)?;
    let sender_blob = aead::encrypt(&k_sender, &sender.public.0, ephemeral_pub.as_bytes())?;

    let sender_x = sender.to_x25519_secret();
    let dh_s = sender_x.diffie_hellman(&recipient_x);

    let mut ikm = Vec::with_capacity(64);
    ikm.extend_from_slice(dh_e.as_bytes());
    ikm.extend_from_slice(dh_s.as_bytes());
    let k_payload = derive_key(&ikm, INFO_PAYLOAD)?;
    ikm.zeroize();

    let ciphertext = aead::encrypt(&k_payload, message, ephemeral_pub.as_bytes())?;

    let envelope = PackedEnvelope {
        version: ENVELOPE_VERSION,
        recipient_key: recipient.to_b64(),
        ephemeral_pub: URL_SAFE_NO_PAD.encode(ephemeral_pub.as_bytes()),
        sender: URL_SAFE_NO_PAD.encode(&sender_blob),
        ciphertext: URL_SAFE_NO_PAD.encode(&ciphertext),
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Parse wire bytes into an envelope without decrypting anything (the
/// keystore lookup needs `recipient_key` before a secret is touched).
pub fn parse(packed: &[u8]) -> Result<PackedEnvelope, CryptoError> {
    let envelope: PackedEnvelope = serde_json::from_slice(packed)
        .map_err(|e| CryptoError::MalformedEnvelope(e.to_string()))?;
    if envelope.version != ENVELOPE_VERSION {
        return Err(CryptoError::UnsupportedVersion(envelope.version));
    }
    Ok(envelope)
}

/// Open a sealed envelope with the recipient's signing keypair.
pub fn open(
    envelope: &PackedEnvelope,
    recipient: &SigningKeyPair,
) -> Result<OpenedEnvelope, CryptoError> {
    let recipient_key = VerificationKey::from_b64(&envelope.recipient_key)?;
    if recipient_key != recipient.public {
        return Err(CryptoError::InvalidKey(
            "envelope is not addressed to this key".into(),
        ));
    }

    let ephemeral_bytes = b64d(&envelope.ephemeral_pub)?;
    let ephemeral_pub = X25519Public::from(to_32(&ephemeral_bytes)?);

    let recipient_x = recipient.to_x25519_secret();
    let dh_e = recipient_x.diffie_hellman(&ephemeral_pub);

    let k_sender = derive_key(dh_e.as_bytes(), INFO_SENDER)?;
    let sender_blob = b64d(&envelope.sender)?;
    let sender_bytes = aead::decrypt(&k_sender, &sender_blob, ephemeral_pub.as_bytes())?;
    if sender_bytes.len() != KEY_LEN {
        return Err(CryptoError::InvalidKey(
            "decrypted sender key has wrong length".into(),
        ));
    }
    let sender_key = VerificationKey(sender_bytes.to_vec());

    let sender_x_pub = sender_key.to_x25519()?;
    let dh_s = recipient_x.diffie_hellman(&sender_x_pub);

    let mut ikm = Vec::with_capacity(64);
    ikm.extend_from_slice(dh_e.as_bytes());
    ikm.extend_from_slice(dh_s.as_bytes());
    let k_payload = derive_key(&ikm, INFO_PAYLOAD)?;
    ikm.zeroize();

    let ct = b64d(&envelope.ciphertext)?;
    let message = aead::decrypt(&k_payload, &ct, ephemeral_pub.as_bytes())?;

    Ok(OpenedEnvelope {
        message,
        sender_key,
        recipient_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_open_round_trip() {
        let sender = SigningKeyPair::generate();
        let recipient = SigningKeyPair::generate();
        let packed = pack(b"hop payload", &sender, &recipient.public).unwrap();

        let envelope = parse(&packed).unwrap();
        let opened = open(&envelope, &recipient).unwrap();
        assert_eq!(opened.message.as_slice(), b"hop payload");
        assert_eq!(opened.sender_key, sender.public);
        assert_eq!(opened.recipient_key, recipient.public);
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let sender = SigningKeyPair::generate();
        let recipient = SigningKeyPair::generate();
        let packed = pack(b"payload", &sender, &recipient.public).unwrap();

        let mut envelope = parse(&packed).unwrap();
        let mut ct = b64d(&envelope.ciphertext).unwrap();
        ct[0] ^= 0x01;
        envelope.ciphertext = URL_SAFE_NO_PAD.encode(&ct);

        assert!(matches!(
            open(&envelope, &recipient),
            Err(CryptoError::AeadDecrypt)
        ));
    }

    #[test]
    fn wrong_recipient_cannot_open() {
        let sender = SigningKeyPair::generate();
        let recipient = SigningKeyPair::generate();
        let mallory = SigningKeyPair::generate();
        let packed = pack(b"payload", &sender, &recipient.public).unwrap();

        let mut envelope = parse(&packed).unwrap();
        // Not addressed to mallory at all
        assert!(open(&envelope, &mallory).is_err());

        // Re-addressed to mallory: the DH no longer matches, the sender
        // blob fails authentication
        envelope.recipient_key = mallory.public.to_b64();
        assert!(matches!(
            open(&envelope, &mallory),
            Err(CryptoError::AeadDecrypt)
        ));
    }

    #[test]
    fn truncated_wire_fails_parse() {
        let sender = SigningKeyPair::generate();
        let recipient = SigningKeyPair::generate();
        let packed = pack(b"payload", &sender, &recipient.public).unwrap();
        assert!(matches!(
            parse(&packed[..packed.len() / 2]),
            Err(CryptoError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn future_version_is_rejected() {
        let sender = SigningKeyPair::generate();
        let recipient = SigningKeyPair::generate();
        let packed = pack(b"payload", &sender, &recipient.public).unwrap();

        let mut value: serde_json::Value = serde_json::from_slice(&packed).unwrap();
        value["version"] = serde_json::json!(9);
        let bumped = serde_json::to_vec(&value).unwrap();
        assert!(matches!(
            parse(&bumped),
            Err(CryptoError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn empty_message_round_trips() {
        let sender = SigningKeyPair::generate();
        let recipient = SigningKeyPair::generate();
        let packed = pack(b"", &sender, &recipient.public).unwrap();
        let opened = open(&parse(&packed).unwrap(), &recipient).unwrap();
        assert!(opened.message.is_empty());
    }
}
