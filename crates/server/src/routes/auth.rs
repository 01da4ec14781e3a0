use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use service::auth::{
    domain::{LoginInput, RegisterInput},
    repo::seaorm::SeaOrmAuthRepository,
    service::{AuthConfig, AuthService},
};

use crate::auth::ServerState;
use crate::errors::ApiError;

/// Wire bodies use `pswd` for the password field, matching the legacy API.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub pswd: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub pswd: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterOutput { pub msg: String }

#[derive(Serialize)]
pub struct LoginOutput { pub msg: String, pub token: String }

fn require(field: Option<String>, name: &str) -> Result<String, ApiError> {
    match field {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("{name} required"))),
    }
}

fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    let repo = Arc::new(SeaOrmAuthRepository { db: state.db.clone() });
    AuthService::new(repo, AuthConfig::new(state.keys.clone()))
}

#[utoipa::path(post, path = "/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Missing field or email exists")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<RegisterOutput>), ApiError> {
    let name = require(body.name, "name")?;
    let email = require(body.email, "email")?;
    let pswd = require(body.pswd, "pswd")?;

    auth_service(&state)
        .register(RegisterInput { name, email, password: pswd })
        .await?;
    Ok((StatusCode::CREATED, Json(RegisterOutput { msg: "user created successfully".into() })))
}

#[utoipa::path(post, path = "/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in, token in body"), (status = 400, description = "Missing field"), (status = 401, description = "Invalid credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<LoginOutput>, ApiError> {
    let email = require(body.email, "email")?;
    let pswd = require(body.pswd, "pswd")?;

    let session = auth_service(&state)
        .login(LoginInput { email, password: pswd })
        .await?;
    Ok(Json(LoginOutput { msg: "login successfully".into(), token: session.token }))
}
