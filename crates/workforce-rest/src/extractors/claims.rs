//! JWT claims extractor.

use crate::middleware::TokenRejection;
use crate::responses::AppError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use workforce_core::WorkforceError;
use workforce_security::Claims;

/// Extractor for authenticated caller claims.
///
/// Relies on `auth_middleware` having validated the bearer token; fails
/// with 401 when no token was sent or the token was rejected.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl std::ops::Deref for AuthenticatedUser {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(Self(claims.clone()));
        }

        if let Some(rejection) = parts.extensions.get::<TokenRejection>() {
            return Err(AppError(rejection.clone().into()));
        }

        let message = if parts.headers.contains_key(AUTHORIZATION) {
            "Invalid authorization format"
        } else {
            "Missing authorization header"
        };
        Err(AppError(WorkforceError::unauthorized(message)))
    }
}
