use uuid::Uuid;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder};

use models::{comment, post};
use crate::errors::ServiceError;

/// Create a comment on an existing post, owned by the authenticated user.
pub async fn create_comment(
    db: &DatabaseConnection,
    author_id: Uuid,
    post_id: Uuid,
    body: &str,
) -> Result<comment::Model, ServiceError> {
    let _post = post::Entity::find_by_id(post_id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("post"))?;
    let created = comment::create(db, author_id, post_id, body).await?;
    Ok(created)
}

/// List comments for a post, oldest first.
pub async fn list_for_post(db: &DatabaseConnection, post_id: Uuid) -> Result<Vec<comment::Model>, ServiceError> {
    let comments = comment::Entity::find()
        .filter(comment::Column::PostId.eq(post_id))
        .order_by_asc(comment::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(comments)
}

/// Delete a comment, owner only.
pub async fn delete_comment(db: &DatabaseConnection, id: Uuid, author_id: Uuid) -> Result<(), ServiceError> {
    let found = comment::Entity::find_by_id(id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("comment"))?;
    if found.author_id != author_id {
        return Err(ServiceError::not_owner("comment"));
    }
    found.delete(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post_service::{create_post, delete_post, NewPost};
    use crate::test_support::get_db;
    use models::user;

    #[tokio::test]
    async fn comment_flow() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let a = user::create(&db, &format!("ca_{}@example.com", Uuid::new_v4()), "A").await?;
        let b = user::create(&db, &format!("cb_{}@example.com", Uuid::new_v4()), "B").await?;
        let p = create_post(&db, a.id, NewPost { title: "T".into(), body: "B".into(), image: None }).await?;

        let c = create_comment(&db, b.id, p.id, "nice post").await?;
        assert_eq!(c.post_id, p.id);

        let listed = list_for_post(&db, p.id).await?;
        assert_eq!(listed.len(), 1);

        // commenting on a missing post is NotFound
        let missing = create_comment(&db, b.id, Uuid::new_v4(), "hello").await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        // only the comment author may delete
        let err = delete_comment(&db, c.id, a.id).await;
        assert!(matches!(err, Err(ServiceError::Forbidden(_))));
        delete_comment(&db, c.id, b.id).await?;

        delete_post(&db, p.id, a.id).await?;
        user::hard_delete(&db, a.id).await?;
        user::hard_delete(&db, b.id).await?;
        Ok(())
    }
}
