use uuid::Uuid;
use chrono::Utc;
use sea_orm::{DatabaseConnection, ActiveModelTrait, EntityTrait, ModelTrait, Set};

use models::user;
use crate::{errors::ServiceError, pagination::Pagination};

/// Partial update for a user. Absent fields are left untouched; the password
/// is changed through the auth flow, never through this patch.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Get a user by id.
pub async fn get_user(db: &DatabaseConnection, id: Uuid) -> Result<Option<user::Model>, ServiceError> {
    let found = user::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// List users with pagination.
pub async fn list_users(
    db: &DatabaseConnection,
    opts: Pagination,
) -> Result<Vec<user::Model>, ServiceError> {
    use sea_orm::PaginatorTrait;
    let (page_idx, per_page) = opts.normalize();
    let users = user::Entity::find()
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(users)
}

/// Apply a patch to a user. Email change runs into the same unique index as
/// registration and surfaces as a conflict.
pub async fn update_user(db: &DatabaseConnection, id: Uuid, patch: UserPatch) -> Result<user::Model, ServiceError> {
    let mut am: user::ActiveModel = user::Entity::find_by_id(id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))?
        .into();
    if let Some(name) = patch.name {
        user::validate_name(&name)?;
        am.name = Set(name);
    }
    if let Some(email) = patch.email {
        user::validate_email(&email)?;
        am.email = Set(email);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(models::errors::ModelError::from_db)?;
    Ok(updated)
}

/// Delete a user record. Credentials go with it (FK cascade); posts and
/// comments stay behind.
pub async fn delete_user(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let found = user::Entity::find_by_id(id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    found.delete(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn user_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let email = format!("svc_{}@example.com", Uuid::new_v4());
        let u = user::create(&db, &email, "Svc User").await?;
        assert_eq!(u.email, email);

        let found = get_user(&db, u.id).await?.unwrap();
        assert_eq!(found.id, u.id);

        let updated = update_user(&db, u.id, UserPatch { name: Some("New Name".into()), email: None }).await?;
        assert_eq!(updated.name, "New Name");

        delete_user(&db, u.id).await?;
        assert!(get_user(&db, u.id).await?.is_none());

        let missing = update_user(&db, u.id, UserPatch::default()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_create_conflicts() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let email = format!("dup_{}@example.com", Uuid::new_v4());
        let u = user::create(&db, &email, "First").await?;
        let second = user::create(&db, &email, "Second").await;
        assert!(matches!(second, Err(models::errors::ModelError::Conflict(_))));

        user::hard_delete(&db, u.id).await?;
        Ok(())
    }
}
