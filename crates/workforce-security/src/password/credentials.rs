//! Login credentials configured at startup.

use super::PasswordHasher;
use tracing::{debug, info};
use workforce_config::UserCredentialConfig;
use workforce_core::{Role, WorkforceError, WorkforceResult};

struct StoredCredential {
    username: String,
    password_hash: String,
    roles: Vec<Role>,
}

/// Who logged in and with which roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub roles: Vec<Role>,
}

/// The configured users, with passwords held only as Argon2 hashes.
pub struct CredentialStore {
    users: Vec<StoredCredential>,
    hasher: PasswordHasher,
}

impl CredentialStore {
    /// Hashes every configured password.
    ///
    /// # Errors
    /// `Internal` if hashing fails.
    pub fn from_config(users: &[UserCredentialConfig], hasher: PasswordHasher) -> WorkforceResult<Self> {
        let users = users
            .iter()
            .map(|user| {
                Ok(StoredCredential {
                    username: user.username.clone(),
                    password_hash: hasher.hash(&user.password)?,
                    roles: user.roles.clone(),
                })
            })
            .collect::<WorkforceResult<Vec<_>>>()?;

        info!(users = users.len(), "Credential store initialized");
        Ok(Self { users, hasher })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Checks a username (case-insensitive) and password (exact).
    ///
    /// # Errors
    /// `Validation` when either field is empty; `InvalidCredentials` when the
    /// user is unknown, the password does not match, or the user has no roles.
    pub fn authenticate(&self, username: &str, password: &str) -> WorkforceResult<AuthenticatedUser> {
        if username.is_empty() || password.is_empty() {
            return Err(WorkforceError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let user = self
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .ok_or(WorkforceError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash)? || user.roles.is_empty() {
            debug!(username, "Rejected login");
            return Err(WorkforceError::InvalidCredentials);
        }

        Ok(AuthenticatedUser {
            username: username.to_string(),
            roles: user.roles.clone(),
        })
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("users", &self.users.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hasher::fast_hasher;
    use workforce_config::SecurityConfig;

    fn store() -> CredentialStore {
        CredentialStore::from_config(&SecurityConfig::default().users, fast_hasher()).unwrap()
    }

    #[test]
    fn test_demo_users_authenticate() {
        let store = store();
        assert_eq!(store.len(), 4);

        let cases = [
            ("admin", "admin123", Role::Admin),
            ("manager", "manager123", Role::Manager),
            ("employee", "employee123", Role::Employee),
            ("readonly", "readonly123", Role::ReadOnly),
        ];
        for (username, password, role) in cases {
            let user = store.authenticate(username, password).unwrap();
            assert_eq!(user.roles, vec![role]);
        }
    }

    #[test]
    fn test_username_is_case_insensitive_and_echoed() {
        let user = store().authenticate("Manager", "manager123").unwrap();
        assert_eq!(user.username, "Manager");
        assert_eq!(user.roles, vec![Role::Manager]);
    }

    #[test]
    fn test_password_is_case_sensitive() {
        assert!(matches!(
            store().authenticate("admin", "ADMIN123"),
            Err(WorkforceError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unknown_user_rejected() {
        assert!(matches!(
            store().authenticate("ghost", "admin123"),
            Err(WorkforceError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_empty_fields_are_a_validation_error() {
        let store = store();
        for (username, password) in [("", "admin123"), ("admin", ""), ("", "")] {
            let err = store.authenticate(username, password).unwrap_err();
            assert_eq!(err.to_string(), "Validation error: Username and password are required");
        }
    }
}
