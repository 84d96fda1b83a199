use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_users::Users;
use crate::m20240101_000002_create_blog_categories::BlogCategories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogPosts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlogPosts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlogPosts::CategoryId).big_integer().not_null())
                    .col(ColumnDef::new(BlogPosts::UserId).big_integer().not_null())
                    .col(ColumnDef::new(BlogPosts::Title).string().not_null())
                    .col(ColumnDef::new(BlogPosts::Slug).string().not_null())
                    .col(ColumnDef::new(BlogPosts::Excerpt).text().not_null())
                    .col(ColumnDef::new(BlogPosts::ContentRaw).text().not_null())
                    .col(ColumnDef::new(BlogPosts::ContentHtml).text().not_null())
                    .col(
                        ColumnDef::new(BlogPosts::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_posts_category")
                            .from(BlogPosts::Table, BlogPosts::CategoryId)
                            .to(BlogCategories::Table, BlogCategories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_posts_user")
                            .from(BlogPosts::Table, BlogPosts::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_posts_slug")
                    .table(BlogPosts::Table)
                    .col(BlogPosts::Slug)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlogPosts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BlogPosts {
    Table,
    Id,
    CategoryId,
    UserId,
    Title,
    Slug,
    Excerpt,
    ContentRaw,
    ContentHtml,
    IsPublished,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
