//! Password hashing using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2, Params,
};
use std::sync::Arc;
use tracing::debug;
use workforce_core::{WorkforceError, WorkforceResult};

/// Argon2id password hasher.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Arc<Argon2<'static>>,
}

impl PasswordHasher {
    /// Creates a new password hasher with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    /// Creates a new password hasher with custom parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        Self {
            argon2: Arc::new(argon2),
        }
    }

    /// Hashes a password.
    ///
    /// # Errors
    /// `Internal` if Argon2 rejects the input.
    pub fn hash(&self, password: &str) -> WorkforceResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| WorkforceError::Internal(format!("Failed to hash password: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a password against a hash.
    ///
    /// # Errors
    /// `Internal` if the stored hash is malformed.
    pub fn verify(&self, password: &str, hash: &str) -> WorkforceResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| WorkforceError::Internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: incorrect password");
                Ok(false)
            }
            Err(e) => Err(WorkforceError::Internal(format!("Password verification error: {e}"))),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(Params::new(8, 1, 1, None).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("manager123").unwrap();

        assert!(hasher.verify("manager123", &hash).unwrap());
        assert!(!hasher.verify("Manager123", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = fast_hasher();
        let first = hasher.hash("admin123").unwrap();
        let second = hasher.hash("admin123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("admin123", &second).unwrap());
    }

    #[test]
    fn test_invalid_hash_format_returns_error() {
        let hasher = fast_hasher();
        assert!(hasher.verify("password", "not-a-valid-hash").is_err());
    }

    #[test]
    fn test_default_params_round_trip() {
        let hasher = PasswordHasher::default();
        let hash = hasher.hash("readonly123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("readonly123", &hash).unwrap());
    }
}
