use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/wallet/unpack", post(handlers::wallet::unpack))
        .route("/wallet/did/public", get(handlers::wallet::public_did))
        .route("/wallet/{seed}", get(handlers::wallet::verification_key))
        .with_state(state)
}
