//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - `minimal` - No database driver, in-memory repositories only

pub mod auth;
pub mod database;
pub mod memory;

// Re-exports
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::DatabaseConfig;
pub use memory::InMemoryBlogStore;

#[cfg(feature = "postgres")]
pub use database::{PostgresCategoryRepository, PostgresPostRepository, PostgresUserRepository};
