//! relay_crypto — cryptographic primitives for the agent message relay
//!
//! # Design principles
//! - NO custom crypto; all primitives come from audited Rust crates.
//! - Zeroize secret material on drop; decrypted plaintext travels in
//!   `Zeroizing` buffers.
//! - Public APIs take and return opaque newtypes to prevent accidental
//!   misuse of raw key bytes.
//!
//! # Module layout
//! - `keys`     — Ed25519 signing keypairs, verification-key encoding,
//!                Ed25519 to X25519 conversion for envelope DH
//! - `aead`     — XChaCha20-Poly1305 encrypt/decrypt helpers
//! - `envelope` — sealed envelope pack/parse/open (the packed message format)
//! - `error`    — unified error type

pub mod aead;
pub mod envelope;
pub mod error;
pub mod keys;

pub use error::CryptoError;
