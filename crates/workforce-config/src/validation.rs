//! Configuration validation.
//!
//! Every problem is collected so a misconfigured deployment reports all of
//! them at once instead of failing on the first.

use crate::{AppConfig, CacheBackend, DatabaseBackend, DEFAULT_JWT_SECRET};
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Minimum signing key length accepted in production.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("database.url is required for the mysql backend")]
    MissingDatabaseUrl,

    #[error("invalid {name} URL: {message}")]
    InvalidUrl { name: &'static str, message: String },

    #[error("invalid pool size: min ({min}) is greater than max ({max})")]
    InvalidPoolSize { min: u32, max: u32 },

    #[error("security.jwt_secret is required")]
    MissingJwtSecret,

    #[error("security.jwt_secret is {actual} bytes, production requires at least {minimum}")]
    JwtSecretTooShort { actual: usize, minimum: usize },

    #[error("the default JWT secret cannot be used in production")]
    DefaultJwtSecretInProduction,

    #[error("security.jwt_expiration_minutes must be positive")]
    ZeroTokenLifetime,

    #[error("server.port must be non-zero")]
    InvalidPort,

    #[error("server.request_timeout_secs must be positive")]
    ZeroRequestTimeout,

    #[error("duplicate login user: {0}")]
    DuplicateUser(String),
}

/// Checks a loaded configuration.
///
/// # Errors
/// Returns every problem found.
pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
    let mut errors = Vec::new();
    let production = config.app.is_production();

    if config.server.port == 0 {
        errors.push(ConfigValidationError::InvalidPort);
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ConfigValidationError::ZeroRequestTimeout);
    }

    let db = &config.database;
    if db.backend == DatabaseBackend::Mysql {
        if db.url.trim().is_empty() {
            errors.push(ConfigValidationError::MissingDatabaseUrl);
        } else if let Err(e) = Url::parse(&db.url) {
            errors.push(ConfigValidationError::InvalidUrl {
                name: "database",
                message: e.to_string(),
            });
        }
        if db.min_connections > db.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: db.min_connections,
                max: db.max_connections,
            });
        }
    }

    if config.cache.backend == CacheBackend::Redis {
        if let Err(e) = Url::parse(&config.redis.url) {
            errors.push(ConfigValidationError::InvalidUrl {
                name: "redis",
                message: e.to_string(),
            });
        }
    }

    let security = &config.security;
    if security.jwt_secret.is_empty() {
        errors.push(ConfigValidationError::MissingJwtSecret);
    } else if security.jwt_secret == DEFAULT_JWT_SECRET {
        if production {
            errors.push(ConfigValidationError::DefaultJwtSecretInProduction);
        } else {
            warn!("Using the default JWT secret; set WORKFORCE__SECURITY__JWT_SECRET before deploying");
        }
    } else if production && security.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
        errors.push(ConfigValidationError::JwtSecretTooShort {
            actual: security.jwt_secret.len(),
            minimum: MIN_PRODUCTION_SECRET_LEN,
        });
    }
    if security.jwt_expiration_minutes == 0 {
        errors.push(ConfigValidationError::ZeroTokenLifetime);
    }

    let mut seen = std::collections::HashSet::new();
    for user in &security.users {
        if !seen.insert(user.username.to_lowercase()) {
            errors.push(ConfigValidationError::DuplicateUser(user.username.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
