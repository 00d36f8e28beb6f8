//! Application state for Axum web framework.
//!
//! Everything shared between handlers is built here once and injected: the
//! HTTP client, the query cache and the stores.

use std::sync::Arc;

use crate::cache::{CacheManager, QueryCache};
use crate::config::{JwtConfig, Settings, StorageBackend};
use crate::db::{AsyncDbPool, establish_async_connection_pool};
use crate::error::AppResult;
use crate::external::catalog::{CatalogSource, DummyJsonCatalog};
use crate::external::client::build_http_client;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since every member is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Present only with the PostgreSQL storage backend
    pub db_pool: Option<AsyncDbPool>,
    /// Secret shared with the token issuer
    pub jwt_config: JwtConfig,
}

impl AppState {
    pub fn new(services: Services, db_pool: Option<AsyncDbPool>, jwt_config: JwtConfig) -> Self {
        Self {
            services,
            db_pool,
            jwt_config,
        }
    }

    /// Builds the state described by `settings`, connecting to the database
    /// when the PostgreSQL backend is selected.
    pub async fn from_settings(settings: &Settings) -> AppResult<Self> {
        let (repos, db_pool) = match settings.storage.backend {
            StorageBackend::Postgres => {
                tracing::info!("Initializing database connection pool...");
                let pool = establish_async_connection_pool(&settings.database).await?;
                tracing::info!("Database connection pool initialized");
                (Repositories::postgres(pool.clone()), Some(pool))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; carts and favorites are lost on restart");
                (Repositories::memory(), None)
            }
        };

        let client = build_http_client(&settings.catalog)?;
        let source: Arc<dyn CatalogSource> = Arc::new(DummyJsonCatalog::new(
            client,
            settings.catalog.base_url.clone(),
        ));
        let cache = QueryCache::new(CacheManager::new(&settings.cache));

        let services = Services::new(repos, source, cache);
        Ok(Self::new(services, db_pool, settings.jwt.clone()))
    }
}
