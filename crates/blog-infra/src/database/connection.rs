use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Log every SQL statement through `tracing`.
    pub sql_logging: bool,
}

impl DatabaseConfig {
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const IDLE_TIMEOUT: Duration = Duration::from_secs(300);
}

/// Open the connection pool described by `config`.
#[cfg(feature = "postgres")]
pub async fn connect(config: &DatabaseConfig) -> Result<DbConn, DbErr> {
    tracing::info!("Initializing database connection...");

    let opts = ConnectOptions::new(&config.url)
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(DatabaseConfig::CONNECT_TIMEOUT)
        .idle_timeout(DatabaseConfig::IDLE_TIMEOUT)
        .sqlx_logging(config.sql_logging)
        .to_owned();

    let conn = Database::connect(opts).await?;
    tracing::info!(
        "Database connected (pool: {}-{})",
        config.min_connections,
        config.max_connections
    );

    Ok(conn)
}
