//! Blog schema: users, categories and posts.

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_blog_categories;
mod m20240101_000003_create_blog_posts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_blog_categories::Migration),
            Box::new(m20240101_000003_create_blog_posts::Migration),
        ]
    }
}
