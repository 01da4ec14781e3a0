use uuid::Uuid;
use chrono::Utc;
use sea_orm::{DatabaseConnection, ActiveModelTrait, EntityTrait, ModelTrait, Set};
use serde::Serialize;

use models::{post, user};
use crate::{errors::ServiceError, pagination::Pagination};

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub image: Option<String>,
}

/// Partial update. `author_id` is deliberately not patchable.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
}

/// Post with its author reference expanded into the author's public fields.
#[derive(Debug, Clone, Serialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: post::Model,
    pub author: Option<user::Model>,
}

/// Create a post owned by the authenticated user.
pub async fn create_post(db: &DatabaseConnection, author_id: Uuid, input: NewPost) -> Result<post::Model, ServiceError> {
    let created = post::create(db, author_id, &input.title, &input.body, input.image).await?;
    Ok(created)
}

/// Get a post by id.
pub async fn get_post(db: &DatabaseConnection, id: Uuid) -> Result<Option<post::Model>, ServiceError> {
    let found = post::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// Get a post with its author expanded.
pub async fn get_post_with_author(db: &DatabaseConnection, id: Uuid) -> Result<Option<PostWithAuthor>, ServiceError> {
    let found = post::Entity::find_by_id(id)
        .find_also_related(user::Entity)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found.map(|(p, a)| PostWithAuthor { post: p, author: a }))
}

/// List posts with authors expanded, paginated.
pub async fn list_posts(
    db: &DatabaseConnection,
    opts: Pagination,
) -> Result<Vec<PostWithAuthor>, ServiceError> {
    use sea_orm::PaginatorTrait;
    let (page_idx, per_page) = opts.normalize();
    let rows = post::Entity::find()
        .find_also_related(user::Entity)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows.into_iter().map(|(p, a)| PostWithAuthor { post: p, author: a }).collect())
}

/// Apply a patch, owner only. Exact id equality decides ownership.
pub async fn update_post(
    db: &DatabaseConnection,
    id: Uuid,
    author_id: Uuid,
    patch: PostPatch,
) -> Result<post::Model, ServiceError> {
    let found = post::Entity::find_by_id(id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("post"))?;
    if found.author_id != author_id {
        return Err(ServiceError::not_owner("post"));
    }
    let mut am: post::ActiveModel = found.into();
    if let Some(title) = patch.title {
        post::validate_title(&title)?;
        am.title = Set(title);
    }
    if let Some(body) = patch.body {
        am.body = Set(body);
    }
    if let Some(image) = patch.image {
        am.image = Set(Some(image));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Delete a post, owner only.
pub async fn delete_post(db: &DatabaseConnection, id: Uuid, author_id: Uuid) -> Result<(), ServiceError> {
    let found = post::Entity::find_by_id(id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("post"))?;
    if found.author_id != author_id {
        return Err(ServiceError::not_owner("post"));
    }
    found.delete(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}
