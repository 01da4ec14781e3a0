//! Auth gate: bearer-token middleware for protected routes.
//!
//! The verified identity is attached to request extensions only. Handlers
//! read it through `Extension<AuthIdentity>`; nothing client-supplied can
//! shadow it.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;
use tracing::warn;
use uuid::Uuid;

use service::auth::token::TokenKeys;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub keys: TokenKeys,
}

/// Authenticated identity, request-scoped.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub user_id: Uuid,
    pub email: String,
}

/// Pull the token out of the `Authorization` header. Accepts both
/// `Bearer <token>` and a raw token (legacy clients send the latter).
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Middleware for protected routes: missing token is 401, bad token is 401,
/// a valid one injects `AuthIdentity` and proceeds. No store access here.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_owned();
    let token = match bearer_token(req.headers()) {
        Some(t) => t.to_owned(),
        None => {
            warn!(%path, "missing bearer token");
            return Err(ApiError::Unauthorized("no token".into()));
        }
    };

    let claims = state.keys.verify(&token).map_err(|e| {
        warn!(%path, code = e.code(), error = %e, "token validation failed");
        ApiError::Unauthorized("invalid token".into())
    })?;

    req.extensions_mut().insert(AuthIdentity {
        user_id: claims.sub,
        email: claims.email,
    });
    Ok(next.run(req).await)
}
