//! Application composition.

use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::future::Future;
use std::sync::Arc;
use tracing::info;
use workforce_config::{AppConfig, CacheBackend, CacheConfig, DatabaseBackend, DatabaseConfig, RedisConfig};
use workforce_core::messaging::{CommandDispatcher, QueryDispatcher};
use workforce_core::{Employee, HealthCheck, WorkforceError, WorkforceResult};
use workforce_repository::{
    create_pool, DatabasePool, InMemoryStore, ReadRepository, RepositoryFactory, SqlRepository,
    SqlRepositoryFactory,
};
use workforce_rest::{create_router, AppState};
use workforce_security::{CredentialStore, PasswordHasher, PolicyTable, TokenProvider};
use workforce_service::{
    command_registry, create_redis_pool, query_registry, AuthServiceImpl, CacheInterface, InMemoryCache,
    RedisCacheService,
};

struct Storage {
    reader: Arc<dyn ReadRepository<Employee>>,
    factory: Arc<dyn RepositoryFactory<Employee>>,
    pool: Option<Arc<DatabasePool>>,
}

impl Storage {
    async fn connect(config: &DatabaseConfig) -> WorkforceResult<Self> {
        match config.backend {
            DatabaseBackend::Memory => {
                info!("Using in-memory employee store");
                let store = InMemoryStore::<Employee>::new();
                Ok(Self {
                    reader: Arc::new(store.repository()),
                    factory: Arc::new(store),
                    pool: None,
                })
            }
            DatabaseBackend::Mysql => {
                let pool = create_pool(config).await?;
                if config.run_migrations {
                    pool.run_migrations().await?;
                }
                Ok(Self {
                    reader: Arc::new(SqlRepository::<Employee>::new(Arc::clone(&pool))),
                    factory: Arc::new(SqlRepositoryFactory::<Employee>::new(Arc::clone(&pool))),
                    pool: Some(pool),
                })
            }
        }
    }
}

fn cache(config: &CacheConfig, redis: &RedisConfig) -> WorkforceResult<(Arc<dyn CacheInterface>, Arc<dyn HealthCheck>)> {
    match config.backend {
        CacheBackend::Memory => {
            info!("Using in-memory query cache");
            let cache = Arc::new(InMemoryCache::new());
            let store: Arc<dyn CacheInterface> = cache.clone();
            let health: Arc<dyn HealthCheck> = cache;
            Ok((store, health))
        }
        CacheBackend::Redis => {
            let cache = Arc::new(RedisCacheService::new(create_redis_pool(redis)?, config.key_prefix.clone()));
            let store: Arc<dyn CacheInterface> = cache.clone();
            let health: Arc<dyn HealthCheck> = cache;
            Ok((store, health))
        }
    }
}

/// A fully wired server, ready to bind.
pub struct Application {
    router: Router,
    addr: String,
    pool: Option<Arc<DatabasePool>>,
}

impl Application {
    /// Builds every component from configuration.
    ///
    /// # Errors
    /// Fails when a backend cannot be reached or a handler is registered twice.
    pub async fn build(config: &AppConfig, metrics: Option<PrometheusHandle>) -> WorkforceResult<Self> {
        Self::build_with(config, metrics, PasswordHasher::new()).await
    }

    /// Like [`Application::build`], hashing the configured logins with `hasher`.
    ///
    /// # Errors
    /// See [`Application::build`].
    pub async fn build_with(
        config: &AppConfig,
        metrics: Option<PrometheusHandle>,
        hasher: PasswordHasher,
    ) -> WorkforceResult<Self> {
        let storage = Storage::connect(&config.database).await?;
        let (cache, cache_health) = cache(&config.cache, &config.redis)?;

        let queries = QueryDispatcher::new(query_registry(storage.reader, cache, config.cache.ttl())?);
        let commands = CommandDispatcher::new(command_registry(storage.factory)?);
        info!(
            queries = ?queries.registry().request_names(),
            commands = ?commands.registry().request_names(),
            "Handlers registered"
        );

        let tokens = Arc::new(TokenProvider::new(&config.security));
        let credentials = Arc::new(CredentialStore::from_config(&config.security.users, hasher)?);
        let auth_service = Arc::new(AuthServiceImpl::new(credentials, Arc::clone(&tokens)));

        let mut state = AppState::new(queries, commands, PolicyTable::standard(), tokens, auth_service)
            .with_health_check(cache_health);
        if let Some(pool) = &storage.pool {
            state = state.with_health_check(pool.clone());
        }
        if let Some(handle) = metrics {
            state = state.with_metrics(handle);
        }

        Ok(Self {
            router: create_router(state, &config.server, &config.observability),
            addr: config.server.addr(),
            pool: storage.pool,
        })
    }

    /// The composed router.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serves until `shutdown` resolves, then closes the database pool.
    ///
    /// # Errors
    /// `Internal` when the listener cannot bind or the server fails.
    pub async fn serve(self, shutdown: impl Future<Output = ()> + Send + 'static) -> WorkforceResult<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| WorkforceError::Internal(format!("Failed to bind {}: {e}", self.addr)))?;
        info!("Listening on http://{}", self.addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| WorkforceError::Internal(format!("Server error: {e}")))?;

        if let Some(pool) = self.pool {
            pool.close().await;
        }
        Ok(())
    }
}
