use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::comment_service;

use crate::auth::{AuthIdentity, ServerState};
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateCommentBody {
    pub body: Option<String>,
}

pub async fn list(
    State(state): State<ServerState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<models::comment::Model>>, ApiError> {
    let comments = comment_service::list_for_post(&state.db, post_id).await?;
    Ok(Json(comments))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CreateCommentBody>,
) -> Result<(StatusCode, Json<models::comment::Model>), ApiError> {
    let text = match body.body {
        Some(b) if !b.trim().is_empty() => b,
        _ => return Err(ApiError::Validation("body required".into())),
    };
    let created = comment_service::create_comment(&state.db, identity.user_id, post_id, &text).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    comment_service::delete_comment(&state.db, id, identity.user_id).await?;
    Ok(Json(serde_json::json!({ "msg": "comment deleted" })))
}
