use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlogCategories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlogCategories::ParentId).big_integer().null())
                    .col(ColumnDef::new(BlogCategories::Title).string().not_null())
                    .col(ColumnDef::new(BlogCategories::Slug).string().not_null())
                    .col(
                        ColumnDef::new(BlogCategories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BlogCategories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BlogCategories::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_categories_parent")
                            .from(BlogCategories::Table, BlogCategories::ParentId)
                            .to(BlogCategories::Table, BlogCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_categories_slug")
                    .table(BlogCategories::Table)
                    .col(BlogCategories::Slug)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlogCategories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum BlogCategories {
    Table,
    Id,
    ParentId,
    Title,
    Slug,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
