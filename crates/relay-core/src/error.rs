//! Relay error taxonomy.
//!
//! Every kind is caller- or input-dependent: none is retried, none is fatal
//! to the process, each is scoped to the single call that produced it.
//! Messages carry the classified kind only; wallet-internal detail is
//! dropped where envelopes are rejected.

use relay_wallet::WalletError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// No wallet capability bound in the request context. A configuration
    /// error on the caller's side, not a property of the message.
    #[error("no wallet is bound in the request context")]
    WalletUnavailable,

    /// The wallet rejected the envelope. Deliberately carries no cause.
    #[error("message unpacking failed")]
    DecryptionFailed,

    /// Decrypted plaintext is not a JSON object.
    #[error("message payload is not a JSON object")]
    MalformedPayload,

    /// The payload parsed but lacks a forwarding field.
    #[error("message payload is missing the `{0}` field")]
    MissingField(&'static str),

    /// Failure in a peripheral wallet operation (key creation, DID lookup).
    #[error("wallet operation failed: {0}")]
    Wallet(#[from] WalletError),
}
