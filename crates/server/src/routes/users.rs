use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::user_service::{self, UserPatch};

use crate::auth::{AuthIdentity, ServerState};
use crate::errors::ApiError;
use crate::routes::PageQuery;

#[derive(Debug, Deserialize)]
pub struct UpdateUserBody {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Public read; the hash lives in another table and cannot appear here.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<models::user::Model>>, ApiError> {
    let users = user_service::list_users(&state.db, query.pagination()).await?;
    Ok(Json(users))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::user::Model>, ApiError> {
    let user = user_service::get_user(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    Ok(Json(user))
}

/// Self-only: the path id must match the authenticated identity.
pub async fn update(
    State(state): State<ServerState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<models::user::Model>, ApiError> {
    if id != identity.user_id {
        return Err(ApiError::Forbidden("cannot modify another user".into()));
    }
    let updated = user_service::update_user(
        &state.db,
        id,
        UserPatch { name: body.name, email: body.email },
    )
    .await?;
    Ok(Json(updated))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if id != identity.user_id {
        return Err(ApiError::Forbidden("cannot delete another user".into()));
    }
    user_service::delete_user(&state.db, id).await?;
    Ok(Json(serde_json::json!({ "msg": "user deleted" })))
}
