//! JWT token provider for creating and validating tokens.

use super::Claims;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, warn};
use workforce_config::SecurityConfig;
use workforce_core::{Role, WorkforceError, WorkforceResult};

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

impl IssuedToken {
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at()
    }
}

/// HS256 token signer and validator.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
    audience: Option<String>,
    lifetime_secs: i64,
}

fn configured(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl TokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(config: &SecurityConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let issuer = configured(&config.jwt_issuer);
        let audience = configured(&config.jwt_audience);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);
        if let Some(iss) = &issuer {
            validation.set_issuer(&[iss]);
        }
        match &audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        let lifetime_secs = i64::try_from(config.token_lifetime().as_secs()).unwrap_or(i64::MAX);

        Self {
            encoding_key,
            decoding_key,
            validation,
            issuer,
            audience,
            lifetime_secs,
        }
    }

    /// Signs a token for the user and roles.
    ///
    /// # Errors
    /// `Internal` if encoding fails.
    pub fn issue(&self, username: &str, roles: &[Role]) -> WorkforceResult<IssuedToken> {
        let claims = Claims::new(
            username,
            roles,
            self.issuer.clone(),
            self.audience.clone(),
            self.lifetime_secs,
        );
        let token = self.sign(&claims)?;
        debug!(username, "Issued access token");
        Ok(IssuedToken { token, claims })
    }

    /// Signs arbitrary claims.
    ///
    /// # Errors
    /// `Internal` if encoding fails.
    pub fn sign(&self, claims: &Claims) -> WorkforceResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| WorkforceError::Internal(format!("Failed to generate access token: {e}")))
    }

    /// Validates signature, lifetime (no clock skew), issuer and audience.
    ///
    /// # Errors
    /// `TokenExpired` or `InvalidToken`.
    pub fn validate(&self, token: &str) -> WorkforceResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            warn!("Token validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => WorkforceError::TokenExpired,
                ErrorKind::ImmatureSignature => WorkforceError::InvalidToken("Token not yet valid".to_string()),
                ErrorKind::InvalidToken | ErrorKind::InvalidSignature => {
                    WorkforceError::InvalidToken("Invalid token signature".to_string())
                }
                ErrorKind::InvalidIssuer => WorkforceError::InvalidToken("Invalid token issuer".to_string()),
                ErrorKind::InvalidAudience => WorkforceError::InvalidToken("Invalid token audience".to_string()),
                _ => WorkforceError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "test-secret-key-for-testing-only".to_string(),
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
            jwt_expiration_minutes: 60,
            ..Default::default()
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let provider = TokenProvider::new(&config());
        let issued = provider.issue("manager", &[Role::Manager]).unwrap();

        let claims = provider.validate(&issued.token).unwrap();
        assert_eq!(claims.sub, "manager");
        assert_eq!(claims.roles, vec!["Manager".to_string()]);
        assert_eq!(claims.iss.as_deref(), Some("test-issuer"));
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(issued.expires_at().timestamp(), claims.exp);
    }

    #[test]
    fn test_expired_token_rejected_without_leeway() {
        let provider = TokenProvider::new(&config());
        let mut claims = Claims::new("admin", &[Role::Admin], Some("test-issuer".into()), Some("test-audience".into()), 60);
        claims.iat -= 120;
        claims.nbf -= 120;
        claims.exp = Utc::now().timestamp() - 1;
        let token = provider.sign(&claims).unwrap();

        assert!(matches!(provider.validate(&token), Err(WorkforceError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let provider = TokenProvider::new(&config());
        let other = TokenProvider::new(&SecurityConfig {
            jwt_secret: "another-secret-key-entirely-different".to_string(),
            ..config()
        });
        let issued = other.issue("admin", &[Role::Admin]).unwrap();

        assert!(matches!(provider.validate(&issued.token), Err(WorkforceError::InvalidToken(_))));
    }

    #[test]
    fn test_issuer_checked_only_when_configured() {
        let strict = TokenProvider::new(&config());
        let lax = TokenProvider::new(&SecurityConfig {
            jwt_issuer: String::new(),
            jwt_audience: String::new(),
            ..config()
        });

        let from_lax = lax.issue("employee", &[Role::Employee]).unwrap();
        assert!(from_lax.claims.iss.is_none());
        assert!(from_lax.claims.aud.is_none());
        assert!(strict.validate(&from_lax.token).is_err());

        let from_strict = strict.issue("employee", &[Role::Employee]).unwrap();
        assert!(lax.validate(&from_strict.token).is_ok());
    }

    #[test]
    fn test_garbage_token() {
        let provider = TokenProvider::new(&config());
        assert!(provider.validate("invalid-token").is_err());
    }
}
