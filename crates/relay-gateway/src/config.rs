use anyhow::{Context, Result};
use std::net::Ipv4Addr;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: Ipv4Addr,
    pub port: u16,
    /// Optional 32-byte seed giving the gateway a stable public DID across
    /// restarts. Without it a fresh identity is generated at startup.
    pub wallet_seed: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let host = std::env::var("RELAY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("RELAY_PORT").unwrap_or_else(|_| "8021".to_string());
        let wallet_seed = std::env::var("RELAY_WALLET_SEED")
            .ok()
            .filter(|seed| !seed.is_empty());

        Ok(Self {
            host: host
                .parse()
                .context("RELAY_HOST must be a valid IPv4 address")?,
            port: port.parse().context("RELAY_PORT must be a valid u16")?,
            wallet_seed,
        })
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_json = std::env::var("LOG_JSON")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if use_json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}
