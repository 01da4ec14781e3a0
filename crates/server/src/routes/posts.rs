use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::post_service::{self, NewPost, PostPatch, PostWithAuthor};

use crate::auth::{AuthIdentity, ServerState};
use crate::errors::ApiError;
use crate::routes::PageQuery;

#[derive(Debug, Deserialize)]
pub struct CreatePostBody {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
}

/// Client cannot supply an author: it always comes from the token identity.
#[derive(Debug, Deserialize)]
pub struct UpdatePostBody {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
}

#[utoipa::path(get, path = "/posts", tag = "posts", responses((status = 200, description = "Posts with authors expanded")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<PostWithAuthor>>, ApiError> {
    let posts = post_service::list_posts(&state.db, query.pagination()).await?;
    Ok(Json(posts))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostWithAuthor>, ApiError> {
    let post = post_service::get_post_with_author(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("post not found".into()))?;
    Ok(Json(post))
}

#[utoipa::path(post, path = "/posts", tag = "posts", request_body = crate::openapi::CreatePostRequest, responses((status = 201, description = "Created"), (status = 400, description = "Missing title"), (status = 401, description = "No/invalid token")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(identity): Extension<AuthIdentity>,
    Json(body): Json<CreatePostBody>,
) -> Result<(StatusCode, Json<models::post::Model>), ApiError> {
    let title = match body.title {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Err(ApiError::Validation("title required".into())),
    };
    let created = post_service::create_post(
        &state.db,
        identity.user_id,
        NewPost {
            title,
            body: body.body.unwrap_or_default(),
            image: body.image,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePostBody>,
) -> Result<Json<models::post::Model>, ApiError> {
    let updated = post_service::update_post(
        &state.db,
        id,
        identity.user_id,
        PostPatch { title: body.title, body: body.body, image: body.image },
    )
    .await?;
    Ok(Json(updated))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    post_service::delete_post(&state.db, id, identity.user_id).await?;
    Ok(Json(serde_json::json!({ "msg": "post deleted" })))
}
