//! Application configuration loaded from environment variables.

use std::env;

use blog_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Path every route is mounted under, e.g. `/api`.
    pub api_prefix: String,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    /// User that posts are attributed to when nobody is signed in.
    pub anonymous_author_id: i64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
            sql_logging: flag_var("DB_SQL_LOGGING").unwrap_or(false),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            api_prefix: normalize_prefix(&env::var("API_PREFIX").unwrap_or_default()),
            database,
            jwt: JwtConfig::from_env(),
            anonymous_author_id: parse_var("ANONYMOUS_AUTHOR_ID").unwrap_or(1),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

fn flag_var(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| v != "false" && v != "0")
}

/// `api/` and `/api/` both become `/api`; blank stays empty.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
