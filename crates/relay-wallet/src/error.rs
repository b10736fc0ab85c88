use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Key not held by this wallet: {0}")]
    UnknownKey(String),

    #[error("No key in this wallet matches the envelope recipient")]
    UnknownRecipient,

    #[error("Decrypted payload is not valid UTF-8")]
    NotUtf8,

    #[error("Crypto error: {0}")]
    Crypto(#[from] relay_crypto::CryptoError),
}
