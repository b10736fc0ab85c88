use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("AEAD encryption failed")]
    AeadEncrypt,

    #[error("AEAD decryption failed (authentication tag mismatch)")]
    AeadDecrypt,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Unsupported envelope version {0}")]
    UnsupportedVersion(u8),

    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
