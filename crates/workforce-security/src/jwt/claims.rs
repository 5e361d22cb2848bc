//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use workforce_core::Role;

/// JWT claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username).
    pub sub: String,

    /// Role names, e.g. `["Manager"]`.
    #[serde(default)]
    pub roles: Vec<String>,

    /// Issued at timestamp.
    pub iat: i64,

    /// Not before timestamp.
    pub nbf: i64,

    /// Expiration timestamp.
    pub exp: i64,

    /// Issuer; omitted when no issuer is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience; omitted when no audience is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// JWT ID (unique identifier for this token).
    pub jti: String,
}

impl Claims {
    /// Creates claims valid from now for `lifetime_secs` seconds.
    #[must_use]
    pub fn new(
        username: &str,
        roles: &[Role],
        issuer: Option<String>,
        audience: Option<String>,
        lifetime_secs: i64,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: username.to_string(),
            roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
            iat: now,
            nbf: now,
            exp: now.saturating_add(lifetime_secs),
            iss: issuer,
            aud: audience,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// The username the token was issued to.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Known roles held by the caller; unrecognised role names are skipped.
    #[must_use]
    pub fn role_set(&self) -> Vec<Role> {
        self.roles.iter().filter_map(|r| r.parse().ok()).collect()
    }

    /// Checks if the caller holds the role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r == role.as_str())
    }

    /// Checks if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Returns the expiration time.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Every claim as a `(type, value)` pair, one pair per role.
    #[must_use]
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("sub".to_string(), self.sub.clone())];
        pairs.extend(self.roles.iter().map(|r| ("role".to_string(), r.clone())));
        pairs.push(("jti".to_string(), self.jti.clone()));
        pairs.push(("nbf".to_string(), self.nbf.to_string()));
        pairs.push(("exp".to_string(), self.exp.to_string()));
        pairs.push(("iat".to_string(), self.iat.to_string()));
        if let Some(iss) = &self.iss {
            pairs.push(("iss".to_string(), iss.clone()));
        }
        if let Some(aud) = &self.aud {
            pairs.push(("aud".to_string(), aud.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let claims = Claims::new("manager", &[Role::Manager], Some("issuer".into()), None, 3600);

        assert_eq!(claims.username(), "manager");
        assert_eq!(claims.roles, vec!["Manager".to_string()]);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.nbf, claims.iat);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_unknown_roles_are_ignored() {
        let mut claims = Claims::new("someone", &[Role::Employee], None, None, 60);
        claims.roles.push("Auditor".to_string());
        claims.roles.push("admin".to_string());

        assert_eq!(claims.role_set(), vec![Role::Employee]);
        assert!(!claims.has_role(Role::Admin));
    }

    #[test]
    fn test_pairs_list_each_role() {
        let claims = Claims::new("admin", &[Role::Admin, Role::Manager], None, Some("clients".into()), 60);
        let pairs = claims.pairs();

        assert_eq!(pairs[0], ("sub".to_string(), "admin".to_string()));
        assert_eq!(pairs.iter().filter(|(t, _)| t == "role").count(), 2);
        assert!(pairs.iter().any(|(t, v)| t == "aud" && v == "clients"));
        assert!(!pairs.iter().any(|(t, _)| t == "iss"));
    }
}
