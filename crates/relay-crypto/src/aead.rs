//! Authenticated Encryption with Associated Data
//!
//! Uses XChaCha20-Poly1305 (192-bit nonce).
//! Key size: 32 bytes.  Nonce: 24 bytes (random).  Tag: 16 bytes.
//!
//! Ciphertext wire format:
//!   [ nonce (24 bytes) | ciphertext + tag ]

use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit, OsRng as AeadOsRng},
    XChaCha20Poly1305,
};
use zeroize::Zeroizing;

use crate::error::CryptoError;

pub const NONCE_LEN: usize = 24;

/// Encrypt `plaintext` with a 32-byte key, prepending a random nonce.
/// `aad` is authenticated but not encrypted.
pub fn encrypt(key: &[u8; 32], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new_from_slice(key).map_err(|_| CryptoError::AeadEncrypt)?;

    let nonce = XChaCha20Poly1305::generate_nonce(&mut AeadOsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            chacha20poly1305::aead::Payload { msg: plaintext, aad },
        )
        .map_err(|_| CryptoError::AeadEncrypt)?;

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt wire-format bytes (nonce || ciphertext+tag).
pub fn decrypt(key: &[u8; 32], data: &[u8], aad: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if data.len() < NONCE_LEN {
        return Err(CryptoError::AeadDecrypt);
    }
    let (nonce_bytes, ct) = data.split_at(NONCE_LEN);
    let nonce = chacha20poly1305::XNonce::from_slice(nonce_bytes);

    let cipher = XChaCha20Poly1305::new_from_slice(key).map_err(|_| CryptoError::AeadDecrypt)?;

    let plaintext = cipher
        .decrypt(nonce, chacha20poly1305::aead::Payload { msg: ct, aad })
        .map_err(|_| CryptoError::AeadDecrypt)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = [0x11u8; 32];
        let out = encrypt(&key, b"forward me", b"aad").unwrap();
        let back = decrypt(&key, &out, b"aad").unwrap();
        assert_eq!(back.as_slice(), b"forward me");
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = [0x22u8; 32];
        let mut out = encrypt(&key, b"payload", b"").unwrap();
        let last = out.len() - 1;
        out[last] ^= 0x01;
        assert!(matches!(
            decrypt(&key, &out, b""),
            Err(CryptoError::AeadDecrypt)
        ));
    }

    #[test]
    fn mismatched_aad_fails() {
        let key = [0x33u8; 32];
        let out = encrypt(&key, b"payload", b"one").unwrap();
        assert!(decrypt(&key, &out, b"two").is_err());
    }

    #[test]
    fn short_input_fails() {
        let key = [0x44u8; 32];
        assert!(decrypt(&key, &[0u8; 8], b"").is_err());
    }
}
