//! Configuration loader with layered sources.

use crate::{validate, AppConfig};
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use workforce_core::WorkforceError;

/// Environment variable selecting the environment overlay.
pub const ENVIRONMENT_VAR: &str = "WORKFORCE_ENV";

/// Prefix of environment variable overrides, e.g. `WORKFORCE__DATABASE__URL`.
pub const ENV_PREFIX: &str = "WORKFORCE";

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `{dir}/default.toml`
    /// 2. `{dir}/{environment}.toml`, environment taken from `WORKFORCE_ENV`
    /// 3. `{dir}/local.toml` (not committed)
    /// 4. Environment variables `WORKFORCE__SECTION__KEY`
    ///
    /// # Errors
    /// `Configuration` when a source cannot be parsed or validation fails.
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, WorkforceError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        let config_dir = config_dir.into();
        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        let config = Self::load(&config_dir, &environment, true)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    ///
    /// # Errors
    /// See [`ConfigLoader::new`].
    pub fn from_default_location() -> Result<Self, WorkforceError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk. The previous configuration is
    /// kept if the new one is invalid.
    ///
    /// # Errors
    /// See [`ConfigLoader::new`].
    pub async fn reload(&self) -> Result<(), WorkforceError> {
        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        let new_config = Self::load(&self.config_dir, &environment, true)?;
        *self.config.write().await = new_config;
        info!("Configuration reloaded");
        Ok(())
    }

    /// Builds and validates the layered configuration.
    pub(crate) fn load(config_dir: &Path, environment: &str, with_env: bool) -> Result<AppConfig, WorkforceError> {
        info!(environment, dir = %config_dir.display(), "Loading configuration");

        let mut builder = Config::builder().set_override("app.environment", environment).map_err(config_error)?;

        for name in ["default", environment, "local"] {
            let path = config_dir.join(format!("{name}.toml"));
            if path.exists() {
                debug!("Loading config file: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        if with_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)?;

        validate(&app_config).map_err(|errors| {
            let message = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
            WorkforceError::Configuration(message)
        })?;

        Ok(app_config)
    }
}

fn config_error(err: ConfigError) -> WorkforceError {
    WorkforceError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheBackend, DatabaseBackend};
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert!(config.cache.ttl().is_none());
        assert_eq!(config.security.token_lifetime().as_secs(), 3600);
        assert_eq!(config.security.users.len(), 4);
    }

    #[test]
    fn test_layers_override_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[server]
port = 9000

[database]
backend = "memory"
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            r#"
[server]
port = 9100

[cache]
ttl_secs = 300
"#,
        )
        .unwrap();

        let config = ConfigLoader::load(dir.path(), "staging", false).unwrap();
        assert_eq!(config.app.environment, "staging");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.database.backend, DatabaseBackend::Memory);
        assert_eq!(config.cache.ttl_secs, Some(300));
    }

    #[test]
    fn test_shipped_defaults_use_bare_cache_keys() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config");
        let config = ConfigLoader::load(&dir, "development", false).unwrap();
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.key_prefix, "");
        assert!(config.cache.ttl().is_none());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[security]\njwt_secret = \"\"\n").unwrap();
        let err = ConfigLoader::load(dir.path(), "development", false).unwrap_err();
        assert!(matches!(err, WorkforceError::Configuration(ref m) if m.contains("database.url")));
        assert!(err.to_string().contains("jwt_secret"));
    }

    #[tokio::test]
    async fn test_loader_get_returns_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[database]\nbackend = \"memory\"\n").unwrap();
        let loader = ConfigLoader {
            config: Arc::new(RwLock::new(ConfigLoader::load(dir.path(), "test", false).unwrap())),
            config_dir: dir.path().to_path_buf(),
        };
        assert_eq!(loader.get().await.database.backend, DatabaseBackend::Memory);
    }
}
