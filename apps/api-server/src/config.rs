//! Application configuration loaded from environment variables.

use std::env;

use order_infra::auth::JwtConfig;
use order_infra::rate_limit::RateLimitConfig;

#[cfg(feature = "postgres")]
use order_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    /// Apply pending schema migrations after connecting.
    #[cfg(feature = "postgres")]
    pub run_migrations: bool,
    pub rate_limit: RateLimitConfig,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            #[cfg(feature = "postgres")]
            database: env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
                url,
                max_connections: parse_var("DB_MAX_CONNECTIONS", 100),
                min_connections: parse_var("DB_MIN_CONNECTIONS", 10),
            }),
            #[cfg(feature = "postgres")]
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            rate_limit: RateLimitConfig::from_env(),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
