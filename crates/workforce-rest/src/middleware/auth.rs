//! Authentication middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use std::sync::Arc;
use tracing::debug;
use workforce_core::WorkforceError;
use workforce_security::TokenProvider;

/// Authentication middleware state.
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub token_provider: Arc<TokenProvider>,
}

impl AuthMiddlewareState {
    #[must_use]
    pub fn new(token_provider: Arc<TokenProvider>) -> Self {
        Self { token_provider }
    }
}

/// Why a presented bearer token was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRejection {
    Expired,
    Invalid(String),
}

impl From<TokenRejection> for WorkforceError {
    fn from(rejection: TokenRejection) -> Self {
        match rejection {
            TokenRejection::Expired => Self::TokenExpired,
            TokenRejection::Invalid(reason) => Self::InvalidToken(reason),
        }
    }
}

/// Validates the bearer token, if any, and records the outcome in the
/// request extensions: [`workforce_security::Claims`] on success, a
/// [`TokenRejection`] otherwise.
///
/// Requests are never rejected here; the `AuthenticatedUser` extractor
/// decides whether a route needs a caller.
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>() {
        match state.token_provider.validate(bearer.token()) {
            Ok(claims) => {
                debug!(username = %claims.sub, "Authenticated caller");
                request.extensions_mut().insert(claims);
            }
            Err(WorkforceError::TokenExpired) => {
                debug!("Token expired");
                request.extensions_mut().insert(TokenRejection::Expired);
            }
            Err(WorkforceError::InvalidToken(reason)) => {
                debug!(%reason, "Token validation failed");
                request.extensions_mut().insert(TokenRejection::Invalid(reason));
            }
            Err(e) => {
                debug!(error = %e, "Token validation failed");
                request.extensions_mut().insert(TokenRejection::Invalid(e.to_string()));
            }
        }
    }

    next.run(request).await
}
