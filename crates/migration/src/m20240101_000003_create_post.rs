//! Create `post` table.
//!
//! `author_id` references `user` but carries no FK constraint: deleting a
//! user leaves its posts behind, matching the store semantics of the API.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Post::Table)
                    .if_not_exists()
                    .col(uuid(Post::Id).primary_key())
                    .col(string_len(Post::Title, 255).not_null())
                    .col(text(Post::Body).not_null())
                    .col(ColumnDef::new(Post::Image).string_len(1024).null())
                    .col(uuid(Post::AuthorId).not_null())
                    .col(timestamp_with_time_zone(Post::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Post::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Post::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Post { Table, Id, Title, Body, Image, AuthorId, CreatedAt, UpdatedAt }
