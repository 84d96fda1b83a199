//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::domain::NewUser;
use blog_core::ports::{CategoryRepository, PostRepository, UserRepository};
use blog_infra::InMemoryBlogStore;

use crate::config::AppConfig;

/// Where the repositories keep their data.
#[derive(Clone)]
pub enum Storage {
    Memory,
    #[cfg(feature = "postgres")]
    Postgres(sea_orm::DbConn),
}

impl Storage {
    /// Short status label for the health endpoint.
    pub async fn status(&self) -> &'static str {
        match self {
            Storage::Memory => "memory",
            #[cfg(feature = "postgres")]
            Storage::Postgres(conn) => match conn.ping().await {
                Ok(()) => "postgres",
                Err(e) => {
                    tracing::error!("Database ping failed: {}", e);
                    "postgres-unreachable"
                }
            },
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<dyn CategoryRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub storage: Storage,
    /// Author of posts written without an authenticated identity.
    pub anonymous_author_id: i64,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let state = match Self::connect_postgres(config).await {
            Some(state) => state,
            None => Self::in_memory(config.anonymous_author_id).await,
        };

        tracing::info!("Application state initialized");
        state
    }

    /// State backed by a fresh in-memory store, seeded with the anonymous author.
    pub async fn in_memory(anonymous_author_id: i64) -> Self {
        let store = InMemoryBlogStore::new();
        let users = store.users();

        match users
            .create(NewUser {
                name: "Unknown author".to_string(),
                email: "unknown@blog.local".to_string(),
                password_hash: String::new(),
            })
            .await
        {
            Ok(author) if author.id != anonymous_author_id => tracing::warn!(
                seeded_id = author.id,
                configured_id = anonymous_author_id,
                "Anonymous author id does not match the seeded in-memory author"
            ),
            Ok(_) => {}
            Err(e) => tracing::warn!("Could not seed anonymous author: {}", e),
        }

        Self {
            categories: Arc::new(store.categories()),
            posts: Arc::new(store.posts()),
            users: Arc::new(users),
            storage: Storage::Memory,
            anonymous_author_id,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect_postgres(config: &AppConfig) -> Option<Self> {
        use blog_infra::{
            PostgresCategoryRepository, PostgresPostRepository, PostgresUserRepository,
        };

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        match blog_infra::database::connect(db_config).await {
            Ok(conn) => Some(Self {
                categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
                posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                users: Arc::new(PostgresUserRepository::new(conn.clone())),
                storage: Storage::Postgres(conn),
                anonymous_author_id: config.anonymous_author_id,
            }),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect_postgres(config: &AppConfig) -> Option<Self> {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        } else {
            tracing::info!("Running without postgres feature - using in-memory repository");
        }
        None
    }
}
