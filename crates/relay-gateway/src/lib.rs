//! relay_gateway — HTTP surface over the relay core.
//!
//! Marshals request bodies in and `DeliveryDetails` / key records out;
//! everything with behaviour lives in `relay_core` and `relay_wallet`.

pub mod api;
pub mod config;

use std::sync::Arc;

use relay_core::RequestContext;

#[derive(Clone)]
pub struct AppState {
    pub context: Arc<RequestContext>,
}
