//! Authentication service.

use crate::dto::{ClaimDto, LoginRequest, LoginResponse, ProfileResponse};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use workforce_core::{WorkforceError, WorkforceResult};
use workforce_security::{Claims, CredentialStore, TokenProvider};

/// Authentication service trait.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies the credentials and issues an access token.
    async fn login(&self, request: LoginRequest) -> WorkforceResult<LoginResponse>;

    /// Describes the caller from its validated claims.
    fn profile(&self, claims: &Claims) -> ProfileResponse;
}

/// Authentication service backed by the configured credential store.
pub struct AuthServiceImpl {
    credentials: Arc<CredentialStore>,
    tokens: Arc<TokenProvider>,
}

impl AuthServiceImpl {
    #[must_use]
    pub fn new(credentials: Arc<CredentialStore>, tokens: Arc<TokenProvider>) -> Self {
        Self { credentials, tokens }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(&self, request: LoginRequest) -> WorkforceResult<LoginResponse> {
        let credentials = Arc::clone(&self.credentials);
        let LoginRequest { username, password } = request;

        // Argon2 verification is CPU-bound.
        let user = tokio::task::spawn_blocking(move || credentials.authenticate(&username, &password))
            .await
            .map_err(|e| WorkforceError::internal(format!("Credential check aborted: {e}")))?
            .inspect_err(|e| {
                if matches!(e, WorkforceError::InvalidCredentials) {
                    warn!("Login rejected");
                }
            })?;

        let issued = self.tokens.issue(&user.username, &user.roles)?;
        info!(username = %user.username, roles = ?user.roles, "User logged in");

        Ok(LoginResponse {
            expires_at: issued.expires_at(),
            token: issued.token,
            username: user.username,
            roles: user.roles,
        })
    }

    fn profile(&self, claims: &Claims) -> ProfileResponse {
        ProfileResponse {
            username: claims.username().to_string(),
            roles: claims.role_set(),
            claims: claims
                .pairs()
                .into_iter()
                .map(|(claim_type, value)| ClaimDto { claim_type, value })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::Params;
    use workforce_config::SecurityConfig;
    use workforce_core::Role;
    use workforce_security::PasswordHasher;

    fn service() -> AuthServiceImpl {
        let config = SecurityConfig::default();
        let hasher = PasswordHasher::with_params(Params::new(8, 1, 1, None).unwrap());
        let credentials = CredentialStore::from_config(&config.users, hasher).unwrap();
        AuthServiceImpl::new(Arc::new(credentials), Arc::new(TokenProvider::new(&config)))
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_token_for_demo_user() {
        let service = service();
        let response = service.login(login("Manager", "manager123")).await.unwrap();

        assert_eq!(response.username, "Manager");
        assert_eq!(response.roles, vec![Role::Manager]);
        assert!(response.expires_at > chrono::Utc::now());

        let claims = TokenProvider::new(&SecurityConfig::default())
            .validate(&response.token)
            .unwrap();
        assert_eq!(claims.role_set(), vec![Role::Manager]);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let err = service().login(login("admin", "wrong")).await.unwrap_err();
        assert!(matches!(err, WorkforceError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let err = service().login(login("admin", "")).await.unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Username and password are required");
    }

    #[tokio::test]
    async fn test_profile_lists_role_claims() {
        let service = service();
        let response = service.login(login("admin", "admin123")).await.unwrap();
        let claims = TokenProvider::new(&SecurityConfig::default())
            .validate(&response.token)
            .unwrap();

        let profile = service.profile(&claims);
        assert_eq!(profile.username, "admin");
        assert_eq!(profile.roles, vec![Role::Admin]);
        assert!(profile.claims.contains(&ClaimDto {
            claim_type: "role".to_string(),
            value: "Admin".to_string(),
        }));
    }
}
