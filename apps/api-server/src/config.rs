//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

#[cfg(feature = "postgres")]
use postboard_infra::database::DatabaseConfig;
use postboard_infra::JwtConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    /// Where anonymous requesters are sent to sign in.
    pub login_url: String,
    /// How long a rendered page of the global feed is reused.
    pub index_cache_ttl: Duration,
    pub jwt: JwtConfig,
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 20),
            min_connections: parsed("DB_MIN_CONNECTIONS", 2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            #[cfg(feature = "postgres")]
            database,
            login_url: env::var("LOGIN_URL").unwrap_or_else(|_| "/auth/login/".to_string()),
            index_cache_ttl: Duration::from_secs(parsed("INDEX_CACHE_TTL_SECS", 20)),
            jwt: JwtConfig::from_env(),
        }
    }
}
