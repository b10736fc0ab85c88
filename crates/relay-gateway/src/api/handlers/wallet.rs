use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay_core::{RelayError, RelayManager};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match &err {
            RelayError::WalletUnavailable => {
                ApiError::bad_request(format!("configuration error: {err}"))
            }
            RelayError::DecryptionFailed
            | RelayError::MalformedPayload
            | RelayError::MissingField(_) => {
                ApiError::bad_request(format!("invalid message: {err}"))
            }
            RelayError::Wallet(_) => ApiError::bad_request(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// `POST /wallet/unpack` — raw packed-message body in, delivery details out.
pub async fn unpack(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let manager = RelayManager::new(&state.context);
    match manager.delivery_details(&body).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// `GET /wallet/{seed}` — create/fetch the verification key for a seed.
pub async fn verification_key(
    State(state): State<AppState>,
    Path(seed): Path<String>,
) -> impl IntoResponse {
    let manager = RelayManager::new(&state.context);
    match manager.verification_key(Some(&seed)).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// `GET /wallet/did/public` — the gateway wallet's public DID.
pub async fn public_did(State(state): State<AppState>) -> impl IntoResponse {
    let manager = RelayManager::new(&state.context);
    match manager.public_did().await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}
