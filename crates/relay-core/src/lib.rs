//! relay_core — the unpack-and-resolve core of the agent message relay.
//!
//! Control flow: raw bytes → wallet unpack → plaintext JSON → delivery
//! details. Each call is an independent, stateless unit of work; the only
//! external dependency is the wallet capability carried by the per-call
//! [`RequestContext`]. Nothing survives a call and nothing is shared
//! between calls.
//!
//! # Modules
//! - `context` — execution-scoped capability injection
//! - `manager` — `RelayManager`: unpack adapter + delivery resolver
//! - `models`  — response-body types
//! - `error`   — relay error taxonomy

pub mod context;
pub mod error;
pub mod manager;
pub mod models;

pub use context::RequestContext;
pub use error::RelayError;
pub use manager::RelayManager;
pub use models::{DeliveryDetails, PublicDidRecord, VerificationKeyRecord};
