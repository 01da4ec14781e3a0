use std::{env, net::SocketAddr};

use anyhow::bail;
use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::token::TokenKeys;

use crate::auth::ServerState;
use crate::routes;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr(cfg: Option<&configs::AppConfig>) -> anyhow::Result<SocketAddr> {
    let (host, port) = match cfg {
        Some(cfg) => (cfg.server.host.clone(), cfg.server.port),
        None => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(5000);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Signing key comes from configuration or `JWT_SECRET` only; there is no
/// baked-in fallback. Rotation = restart with a new secret, outstanding
/// tokens die with the old key.
fn load_token_keys(cfg: Option<&configs::AppConfig>) -> anyhow::Result<TokenKeys> {
    let (secret, ttl) = match cfg {
        Some(cfg) => (cfg.auth.jwt_secret.clone(), cfg.auth.token_ttl_secs),
        None => {
            let ttl = env::var("TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(3600);
            (env::var("JWT_SECRET").ok(), ttl)
        }
    };
    match secret {
        Some(s) if !s.trim().is_empty() => Ok(TokenKeys::new(&s, ttl)),
        _ => bail!("JWT_SECRET is not set; refusing to start with an unsigned token key"),
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // Config file is optional; env vars cover the gaps
    let cfg = configs::AppConfig::load_and_validate().ok();

    let db = match &cfg {
        Some(cfg) => models::db::connect_with(&cfg.database).await?,
        None => models::db::connect().await?,
    };
    migration::Migrator::up(&db, None).await?;

    let keys = load_token_keys(cfg.as_ref())?;
    let state = ServerState { db, keys };

    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    let addr = load_bind_addr(cfg.as_ref())?;
    info!(%addr, "starting blog-api server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
