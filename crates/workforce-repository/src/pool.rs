//! Database connection pool management.

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::sync::Arc;
use tracing::{info, warn};
use workforce_config::DatabaseConfig;
use workforce_core::{HealthCheck, HealthStatus, WorkforceError, WorkforceResult};

/// MySQL pool plus the query-logging switch every repository honours.
pub struct DatabasePool {
    pool: MySqlPool,
    log_queries: bool,
}

impl DatabasePool {
    /// Connects using the configured pool limits.
    ///
    /// # Errors
    /// `Database` when the initial connection fails.
    pub async fn new(config: &DatabaseConfig) -> WorkforceResult<Self> {
        info!(
            min = config.min_connections,
            max = config.max_connections,
            "Connecting to MySQL database"
        );

        let pool = MySqlPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                WorkforceError::Database(format!("Failed to connect: {e}"))
            })?;

        info!("MySQL connection pool established");
        Ok(Self {
            pool,
            log_queries: config.log_queries,
        })
    }

    /// Wraps an existing pool.
    #[must_use]
    pub fn with_pool(pool: MySqlPool, log_queries: bool) -> Self {
        Self { pool, log_queries }
    }

    /// Returns a reference to the underlying pool.
    #[must_use]
    pub fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    /// Whether generated SQL is logged.
    #[must_use]
    pub const fn log_queries(&self) -> bool {
        self.log_queries
    }

    /// Runs `SELECT 1`.
    ///
    /// # Errors
    /// `Database` when the server cannot be reached.
    pub async fn ping(&self) -> WorkforceResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| WorkforceError::Database(format!("Health check failed: {e}")))?;
        Ok(())
    }

    /// Applies the embedded migrations.
    ///
    /// # Errors
    /// `Database` when a migration fails.
    pub async fn run_migrations(&self) -> WorkforceResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| WorkforceError::Database(format!("Migration failed: {e}")))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Closes the pool, waiting for checked-out connections.
    pub async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[async_trait]
impl HealthCheck for DatabasePool {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        match self.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .field("log_queries", &self.log_queries)
            .finish()
    }
}

/// Creates a shared database pool.
///
/// # Errors
/// See [`DatabasePool::new`].
pub async fn create_pool(config: &DatabaseConfig) -> WorkforceResult<Arc<DatabasePool>> {
    let pool = DatabasePool::new(config).await?;
    Ok(Arc::new(pool))
}
