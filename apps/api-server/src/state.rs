//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use postboard_core::BlogService;
use postboard_core::ports::{Cache, TokenService};
use postboard_infra::{InMemoryCache, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use postboard_infra::database::{
    DatabaseConfig, DatabaseConnections, PostgresCommentRepository, PostgresFollowRepository,
    PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub cache: Arc<dyn Cache>,
    pub tokens: Arc<dyn TokenService>,
    pub login_url: String,
    pub index_cache_ttl: Duration,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let blog = match &config.database {
            Some(db_config) => connect(db_config).await,
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                InMemoryStore::new().blog_service()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let blog = {
            tracing::info!("Running without postgres feature - using in-memory store");
            InMemoryStore::new().blog_service()
        };

        let state = Self::from_parts(
            blog,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            config.login_url.clone(),
            config.index_cache_ttl,
        );

        tracing::info!(
            login_url = %state.login_url,
            index_cache_ttl_secs = state.index_cache_ttl.as_secs(),
            "Application state initialized"
        );
        state
    }

    /// Assemble state around an existing access layer.
    pub fn from_parts(
        blog: BlogService,
        tokens: Arc<dyn TokenService>,
        login_url: String,
        index_cache_ttl: Duration,
    ) -> Self {
        Self {
            blog,
            cache: Arc::new(InMemoryCache::new()),
            tokens,
            login_url,
            index_cache_ttl,
        }
    }
}

#[cfg(feature = "postgres")]
async fn connect(config: &DatabaseConfig) -> BlogService {
    match DatabaseConnections::init(config).await {
        Ok(connections) => {
            let db = connections.main;
            BlogService::new(
                Arc::new(PostgresUserRepository::new(db.clone())),
                Arc::new(PostgresGroupRepository::new(db.clone())),
                Arc::new(PostgresPostRepository::new(db.clone())),
                Arc::new(PostgresCommentRepository::new(db.clone())),
                Arc::new(PostgresFollowRepository::new(db)),
            )
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            InMemoryStore::new().blog_service()
        }
    }
}
