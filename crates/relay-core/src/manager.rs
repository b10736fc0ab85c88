//! Unpack adapter + delivery resolver.
//!
//! `delivery_details` is the core path: invoke the wallet's unpack
//! capability on the raw bytes, parse the plaintext as JSON, extract the
//! forwarding fields. A failure at either stage aborts the call; there is
//! no fallback decryption and no continuation with default values. The
//! identity accessors are one-line delegations to the wallet.
//!
//! Plaintext may be sensitive: nothing content-derived is ever logged here.

use serde::Deserialize;
use tracing::debug;

use crate::context::RequestContext;
use crate::error::RelayError;
use crate::models::{DeliveryDetails, PublicDidRecord, VerificationKeyRecord};

/// Forwarding fields as they appear in the decrypted payload. Optional at
/// the wire level; the resolver enforces presence of both.
#[derive(Deserialize)]
struct ForwardFields {
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

pub struct RelayManager<'ctx> {
    context: &'ctx RequestContext,
}

impl<'ctx> RelayManager<'ctx> {
    pub fn new(context: &'ctx RequestContext) -> Self {
        Self { context }
    }

    /// Accessor for the context this manager resolves capabilities from.
    pub fn context(&self) -> &RequestContext {
        self.context
    }

    /// Create a signing key in the wallet and return its verification key.
    pub async fn verification_key(
        &self,
        seed: Option<&str>,
    ) -> Result<VerificationKeyRecord, RelayError> {
        let wallet = self.context.wallet()?;
        let key_info = wallet.create_signing_key(seed).await?;
        debug!(verkey = %key_info.verkey, "created signing key");
        Ok(VerificationKeyRecord { key: key_info.verkey })
    }

    /// The wallet's public DID.
    pub async fn public_did(&self) -> Result<PublicDidRecord, RelayError> {
        let wallet = self.context.wallet()?;
        let did_info = wallet.get_public_did().await?;
        Ok(PublicDidRecord { did: did_info.did })
    }

    /// Unpack `packed` and resolve the next hop's delivery instruction.
    ///
    /// No format checks happen before delegation; the wallet capability is
    /// the sole arbiter of envelope validity.
    pub async fn delivery_details(&self, packed: &[u8]) -> Result<DeliveryDetails, RelayError> {
        let wallet = self.context.wallet()?;

        debug!(bytes = packed.len(), "unpacking message");
        let unpacked = match wallet.unpack_message(packed).await {
            Ok(unpacked) => unpacked,
            Err(err) => {
                // The caller sees the classified kind only; the wallet's
                // reason stays internal.
                debug!(error = %err, "wallet rejected envelope");
                return Err(RelayError::DecryptionFailed);
            }
        };

        let fields: ForwardFields = serde_json::from_str(&unpacked.message)
            .map_err(|_| RelayError::MalformedPayload)?;

        let to = fields.to.ok_or(RelayError::MissingField("to"))?;
        let msg = fields.msg.ok_or(RelayError::MissingField("msg"))?;

        debug!("resolved delivery details");
        Ok(DeliveryDetails { to, msg })
    }
}
