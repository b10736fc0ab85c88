//! Response-body types. These map directly to JSON bodies on the wire.

use serde::{Deserialize, Serialize};

/// The resolved next-hop forwarding instruction.
///
/// Both fields are always populated: a resolution that cannot produce a
/// destination and a payload is an error, never a partially-filled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    /// Destination address for the next hop.
    pub to: String,
    /// Opaque forwarded payload, possibly still encrypted for the next hop.
    pub msg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationKeyRecord {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicDidRecord {
    pub did: String,
}
