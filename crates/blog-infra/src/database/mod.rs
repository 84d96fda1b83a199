//! Database connection management and PostgreSQL repositories.

mod connection;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connection::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use connection::connect;
#[cfg(feature = "postgres")]
pub use postgres_base::SoftDeletable;
#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresPostRepository, PostgresUserRepository,
};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
