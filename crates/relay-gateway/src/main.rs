use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use relay_core::RequestContext;
use relay_gateway::{api, config, AppState};
use relay_wallet::KeystoreWallet;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::init_tracing();
    let cfg = config::AppConfig::from_env()?;

    let wallet = match cfg.wallet_seed.as_deref() {
        Some(seed) => {
            KeystoreWallet::from_did_seed(seed).context("RELAY_WALLET_SEED was rejected")?
        }
        None => KeystoreWallet::new(),
    };
    let state = AppState {
        context: Arc::new(RequestContext::with_wallet(Arc::new(wallet))),
    };

    let app: Router = api::routes::router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from((cfg.host, cfg.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind server on {}", addr))?;

    info!("relay gateway listening on http://{}", addr);
    axum::serve(listener, app).await.context("server crashed")?;
    Ok(())
}
