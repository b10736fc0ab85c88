//! Execution-scoped capability injection.
//!
//! The wallet is passed explicitly via a per-call context, never looked up
//! from global state. The context is read-only once built; callers share it
//! behind an `Arc` and hand a reference to each manager call.

use std::fmt;
use std::sync::Arc;

use relay_wallet::Wallet;

use crate::error::RelayError;

#[derive(Clone, Default)]
pub struct RequestContext {
    wallet: Option<Arc<dyn Wallet>>,
}

impl RequestContext {
    /// A context with nothing bound. Unpack calls against it fail with
    /// `WalletUnavailable`.
    pub fn new() -> Self {
        Self { wallet: None }
    }

    pub fn with_wallet(wallet: Arc<dyn Wallet>) -> Self {
        Self {
            wallet: Some(wallet),
        }
    }

    /// The bound wallet capability, or `WalletUnavailable` if the caller
    /// never configured one.
    pub fn wallet(&self) -> Result<&dyn Wallet, RelayError> {
        self.wallet.as_deref().ok_or(RelayError::WalletUnavailable)
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("wallet", if self.wallet.is_some() { &"bound" } else { &"unbound" })
            .finish()
    }
}
