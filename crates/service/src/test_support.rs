//! Shared helpers for DB-backed tests. Tests are skipped when `SKIP_DB_TESTS`
//! is set or no database is reachable.

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

pub async fn get_db() -> anyhow::Result<DatabaseConnection> {
    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await {
        let msg = format!("{}", e);
        if !msg.contains("duplicate key value violates unique constraint") {
            return Err(e.into());
        }
    }
    Ok(db)
}
